//! Database servers referenced by the loaded groups

use super::collection::{by_label, Collection};
use crate::models::{DbServer, Group};

pub type ServersState = Collection<DbServer>;

impl Collection<DbServer> {
    /// Servers shared in `group`, ordered by name
    pub fn for_group(&self, group: &Group) -> Vec<&DbServer> {
        let mut view: Vec<&DbServer> = self
            .items()
            .iter()
            .filter(|s| group.server_ids.contains(&s.id))
            .collect();
        view.sort_by(by_label);
        view
    }
}
