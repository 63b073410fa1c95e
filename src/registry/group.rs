//! Grouping of resolved modules by author and license.

use crate::types::{GroupedModule, Module};
use std::collections::HashMap;

/// Group modules sharing exactly the same author and license name.
///
/// Groups appear in the order their first module was seen, and modules keep their
/// input order within a group. Keys are compared verbatim.
pub fn group_by_license(modules: &[Module]) -> Vec<GroupedModule> {
    let mut groups: Vec<GroupedModule> = Vec::new();
    let mut indexes: HashMap<(&str, &str), usize> = HashMap::new();

    for module in modules {
        let key = (module.author.as_str(), module.license_name.as_str());
        match indexes.get(&key) {
            Some(&idx) => groups[idx].modules.push(module.clone()),
            None => {
                indexes.insert(key, groups.len());
                groups.push(GroupedModule {
                    author: module.author.clone(),
                    license: module.license_name.clone(),
                    modules: vec![module.clone()],
                });
            }
        }
    }

    groups
}
