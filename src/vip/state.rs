use crate::error::Result;
use crate::persisted::Persisted;
use crate::storage::Storage;

/// Storage key of the VIP list.
pub const VIPS_KEY: &str = "vips";

/// Names installed by [`VipListState::load_default_names`].
pub const DEFAULT_VIPS: [&str; 3] = ["Andrew", "Robert", "Steve"];

const HEADER: &str = "# Vip list \r\n \r\n ";

/// The VIP list, persisted under [`VIPS_KEY`].
///
/// Construct one per application and hand it to whatever needs it.
#[derive(Debug)]
pub struct VipListState<S> {
    names: Persisted<Vec<String>, S>,
}

impl<S: Storage> VipListState<S> {
    /// Load the list from `storage`, starting empty when nothing is stored.
    pub fn new(storage: S) -> Result<Self> {
        Ok(Self {
            names: Persisted::open_default(storage, VIPS_KEY)?,
        })
    }

    /// Like [`new`](Self::new), running `on_change` after every saved change.
    pub fn with_on_change<F>(storage: S, on_change: F) -> Result<Self>
    where
        F: Fn() + Send + Sync + 'static,
    {
        Ok(Self {
            names: Persisted::with_on_change(storage, VIPS_KEY, Vec::new(), on_change)?,
        })
    }

    /// Replace the whole list with [`DEFAULT_VIPS`].
    pub fn load_default_names(&self) -> Result<()> {
        self.names
            .set(DEFAULT_VIPS.iter().map(|name| name.to_string()).collect())
    }

    /// Render the list as markdown-ish text.
    pub fn generate_formatted_list(&self) -> String {
        self.names.read(|names| format_vip_list(names.as_slice()))
    }

    pub fn names(&self) -> Vec<String> {
        self.names.get()
    }

    pub fn set_names(&self, names: Vec<String>) -> Result<()> {
        self.names.set(names)
    }

    pub fn push_name(&self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        self.names.update(|names| names.push(name))
    }

    /// Remove the entry at `index`, returning it. Out-of-range indexes leave
    /// the list untouched and return `None` without saving.
    pub fn remove_name(&self, index: usize) -> Result<Option<String>> {
        self.names.update_if(|names| {
            (index < names.len()).then(|| names.remove(index))
        })
    }

    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&[String]) + Send + Sync + 'static,
    {
        self.names.subscribe(move |names| callback(names.as_slice()));
    }

    /// The underlying persisted cell.
    pub fn state(&self) -> &Persisted<Vec<String>, S> {
        &self.names
    }
}

impl<S> Clone for VipListState<S> {
    fn clone(&self) -> Self {
        Self {
            names: self.names.clone(),
        }
    }
}

/// Format `names` as a VIP list.
///
/// Each name becomes `- <name>`; blank names become empty lines. Lines are
/// joined with CRLF after a fixed header.
pub fn format_vip_list<N: AsRef<str>>(names: &[N]) -> String {
    let body = names
        .iter()
        .map(|name| {
            let name = name.as_ref();
            if name.trim().is_empty() {
                String::new()
            } else {
                format!("- {name}")
            }
        })
        .collect::<Vec<_>>()
        .join("\r\n");

    format!("{HEADER}{body}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStorage;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[test]
    fn format_empty() {
        assert_eq!(format_vip_list::<&str>(&[]), "# Vip list \r\n \r\n ");
    }

    #[test]
    fn format_single() {
        assert_eq!(format_vip_list(&["Andrew"]), "# Vip list \r\n \r\n - Andrew");
    }

    #[test]
    fn format_blank_entry_leaves_empty_line() {
        assert_eq!(
            format_vip_list(&["Andrew", "", "Robert"]),
            "# Vip list \r\n \r\n - Andrew\r\n\r\n- Robert"
        );
    }

    #[test]
    fn format_whitespace_only_is_blank() {
        assert_eq!(format_vip_list(&["  "]), "# Vip list \r\n \r\n ");
        assert_eq!(
            format_vip_list(&["\t", "Steve"]),
            "# Vip list \r\n \r\n \r\n- Steve"
        );
    }

    #[test]
    fn format_keeps_untrimmed_text() {
        assert_eq!(
            format_vip_list(&[" Robert "]),
            "# Vip list \r\n \r\n -  Robert "
        );
    }

    #[test]
    fn starts_empty() {
        let storage = Arc::new(MemoryStorage::new());
        let vips = VipListState::new(storage.clone()).unwrap();

        assert!(vips.names().is_empty());
        assert_eq!(storage.get_item(VIPS_KEY).unwrap().as_deref(), Some("[]"));
        assert_eq!(vips.generate_formatted_list(), "# Vip list \r\n \r\n ");
    }

    #[test]
    fn load_default_names_overwrites() {
        let storage = Arc::new(MemoryStorage::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();

        let vips = VipListState::with_on_change(storage.clone(), move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        vips.set_names(vec!["Zed".to_string(), "Amy".to_string()])
            .unwrap();
        vips.load_default_names().unwrap();

        assert_eq!(vips.names(), DEFAULT_VIPS);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(
            storage.get_item(VIPS_KEY).unwrap().as_deref(),
            Some("[\"Andrew\",\"Robert\",\"Steve\"]")
        );
        assert_eq!(
            vips.generate_formatted_list(),
            "# Vip list \r\n \r\n - Andrew\r\n- Robert\r\n- Steve"
        );
    }

    #[test]
    fn push_and_remove() {
        let vips = VipListState::new(MemoryStorage::new()).unwrap();
        vips.push_name("Andrew").unwrap();
        vips.push_name("").unwrap();
        vips.push_name("Robert").unwrap();
        assert_eq!(
            vips.generate_formatted_list(),
            "# Vip list \r\n \r\n - Andrew\r\n\r\n- Robert"
        );

        assert_eq!(vips.remove_name(1).unwrap(), Some(String::new()));
        assert_eq!(vips.remove_name(5).unwrap(), None);
        assert_eq!(vips.names(), vec!["Andrew", "Robert"]);
    }

    #[test]
    fn remove_out_of_range_does_not_save() {
        let storage = Arc::new(MemoryStorage::new());
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = calls.clone();
        let vips = VipListState::with_on_change(storage.clone(), move || {
            calls_clone.fetch_add(1, Ordering::SeqCst);
        })
        .unwrap();

        storage.set_item(VIPS_KEY, "\"tampered\"").unwrap();
        assert_eq!(vips.remove_name(0).unwrap(), None);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert_eq!(
            storage.get_item(VIPS_KEY).unwrap().as_deref(),
            Some("\"tampered\"")
        );
    }

    #[test]
    fn subscriber_can_rewrite_names() {
        let vips = VipListState::new(MemoryStorage::new()).unwrap();
        {
            let handle = vips.clone();
            vips.subscribe(move |names| {
                if names.iter().any(|name| name.trim().is_empty()) {
                    let cleaned = names
                        .iter()
                        .filter(|name| !name.trim().is_empty())
                        .cloned()
                        .collect();
                    handle.set_names(cleaned).unwrap();
                }
            });
        }

        vips.load_default_names().unwrap();
        vips.push_name("  ").unwrap();
        assert_eq!(vips.names(), DEFAULT_VIPS);
    }

    #[test]
    fn subscribers_see_new_names() {
        let vips = VipListState::new(MemoryStorage::new()).unwrap();
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = seen.clone();

        vips.subscribe(move |names| {
            seen_clone.store(names.len(), Ordering::SeqCst);
        });

        vips.load_default_names().unwrap();
        assert_eq!(seen.load(Ordering::SeqCst), 3);
    }
}
