//! VIP list feature state.

mod state;

pub use state::{format_vip_list, VipListState, DEFAULT_VIPS, VIPS_KEY};
