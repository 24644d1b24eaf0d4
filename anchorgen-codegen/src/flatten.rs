//! Account-tree flattening (§4.6 "Account groups", §8 testable property 4
//! "Account ordering").
//!
//! IDL accounts may be nested into named groups; the linear meta-slice
//! order is the depth-first, declaration-order flattening of that tree.

use anchorgen_idl::types::*;

#[derive(Debug, Clone)]
pub struct FlatAccount {
    pub name: String,
    pub docs: Vec<String>,
    pub writable: bool,
    pub signer: bool,
    pub optional: bool,
    pub address: Option<String>,
    pub pda: Option<Pda>,
    /// Names of the enclosing groups, outermost first; empty for a
    /// top-level account.
    pub group_path: Vec<String>,
}

pub fn flatten(items: &[AccountItem]) -> Vec<FlatAccount> {
    let mut out = Vec::new();
    flatten_into(items, &mut Vec::new(), &mut out);
    out
}

fn flatten_into(items: &[AccountItem], path: &mut Vec<String>, out: &mut Vec<FlatAccount>) {
    for item in items {
        match item {
            AccountItem::Leaf(account) => out.push(FlatAccount {
                name: account.name.clone(),
                docs: account.docs.clone(),
                writable: account.writable,
                signer: account.signer,
                optional: account.optional,
                address: account.address.clone(),
                pda: account.pda.clone(),
                group_path: path.clone(),
            }),
            AccountItem::Group(group) => {
                path.push(group.name.clone());
                flatten_into(&group.accounts, path, out);
                path.pop();
            }
        }
    }
}

/// Top-level named groups only (one level deep is all instruction builders
/// need a typed sub-builder for; deeper nesting still flattens correctly,
/// it simply has no dedicated builder type of its own).
pub fn top_level_groups(items: &[AccountItem]) -> Vec<&AccountGroup> {
    items
        .iter()
        .filter_map(|item| match item {
            AccountItem::Group(g) => Some(g),
            AccountItem::Leaf(_) => None,
        })
        .collect()
}
