//! Pure name-mapping functions (§4.2).
//!
//! Target-language exported identifiers are PascalCase, unexported ones are
//! lowerCamelCase, and the package/module name is snake_case of the program
//! name — the conventions of the emitted Go client.

use std::collections::HashSet;

pub fn to_snake_case(s: &str) -> String {
    let mut result = String::new();
    let mut prev_lower_or_digit = false;
    for c in s.chars() {
        if c == '_' || c == '-' || c == ' ' {
            if !result.is_empty() && !result.ends_with('_') {
                result.push('_');
            }
            prev_lower_or_digit = false;
            continue;
        }
        if c.is_uppercase() {
            if !result.is_empty() && prev_lower_or_digit {
                result.push('_');
            }
            result.push(c.to_ascii_lowercase());
            prev_lower_or_digit = false;
        } else {
            result.push(c);
            prev_lower_or_digit = c.is_lowercase() || c.is_ascii_digit();
        }
    }
    result
}

pub fn to_pascal_case(s: &str) -> String {
    to_snake_case(s)
        .split('_')
        .filter(|w| !w.is_empty())
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                None => String::new(),
                Some(f) => f.to_uppercase().collect::<String>() + chars.as_str(),
            }
        })
        .collect()
}

pub fn to_camel_case(s: &str) -> String {
    let pascal = to_pascal_case(s);
    let mut chars = pascal.chars();
    match chars.next() {
        None => String::new(),
        Some(f) => f.to_lowercase().collect::<String>() + chars.as_str(),
    }
}

/// Derived names (§4.2) used verbatim by the emitter.
pub fn instruction_struct_name(name: &str) -> String {
    format!("Instruction_{}", to_pascal_case(name))
}

pub fn new_instruction_fn(name: &str) -> String {
    format!("New{}Instruction", to_pascal_case(name))
}

pub fn new_instruction_builder_fn(name: &str) -> String {
    format!("New{}InstructionBuilder", to_pascal_case(name))
}

pub fn arg_setter_name(arg: &str) -> String {
    format!("Set{}", to_pascal_case(arg))
}

pub fn account_setter_name(account: &str) -> String {
    format!("Set{}Account", to_pascal_case(account))
}

pub fn account_getter_name(account: &str) -> String {
    format!("Get{}Account", to_pascal_case(account))
}

pub fn find_address_fn(account: &str) -> String {
    format!("Find{}Address", to_pascal_case(account))
}

pub fn find_address_with_bump_fn(account: &str) -> String {
    format!("find{}AddressWithBumpSeed", to_camel_case(account))
}

pub fn must_address_fn(account: &str) -> String {
    format!("Must{}Address", to_pascal_case(account))
}

pub fn discriminator_var_name(instruction_name: &str) -> String {
    format!("{}Discriminator", to_pascal_case(instruction_name))
}

pub fn complex_variant_struct_name(enum_name: &str, variant_name: &str) -> String {
    format!("{}_{}", to_pascal_case(enum_name), to_pascal_case(variant_name))
}

pub fn enum_container_name(enum_name: &str) -> String {
    format!("{}Container", to_camel_case(enum_name))
}

pub fn is_variant_marker_name(enum_name: &str) -> String {
    format!("is{}", to_pascal_case(enum_name))
}

pub fn const_var_name(name: &str) -> String {
    format!("CONST_{}", name)
}

pub fn error_value_name(name: &str) -> String {
    format!("Err{}", to_pascal_case(name))
}

pub fn event_data_struct_name(name: &str) -> String {
    format!("{}EventData", to_pascal_case(name))
}

pub fn account_data_struct_name(name: &str) -> String {
    format!("{}Account", to_pascal_case(name))
}

pub fn tuple_elem_name(index: usize) -> String {
    format!("Elem_{index}")
}

/// Resolve a name collision against the set of already-emitted top-level
/// identifiers by appending `Struct`, as described in §4.2 and §8 scenario
/// "Name conflict". Used for *type* identifiers; collisions between
/// instructions or args are a fatal `GenError::NameConflict` instead
/// (enforced by the caller, not here).
pub fn disambiguate(name: &str, emitted: &mut HashSet<String>) -> String {
    if !emitted.contains(name) {
        emitted.insert(name.to_string());
        return name.to_string();
    }
    let mut candidate = format!("{name}Struct");
    while emitted.contains(&candidate) {
        candidate.push_str("Struct");
    }
    emitted.insert(candidate.clone());
    candidate
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn case_conversions() {
        assert_eq!(to_snake_case("PoolState"), "pool_state");
        assert_eq!(to_snake_case("isMut"), "is_mut");
        assert_eq!(to_pascal_case("pool_state"), "PoolState");
        assert_eq!(to_camel_case("PoolState"), "poolState");
    }

    #[test]
    fn derived_names_match_spec() {
        assert_eq!(new_instruction_fn("init_vault"), "NewInitVaultInstruction");
        assert_eq!(account_setter_name("owner"), "SetOwnerAccount");
        assert_eq!(find_address_fn("vault"), "FindVaultAddress");
        assert_eq!(find_address_with_bump_fn("vault"), "findVaultAddressWithBumpSeed");
        assert_eq!(tuple_elem_name(0), "Elem_0");
    }

    #[test]
    fn name_conflict_gets_struct_suffix() {
        let mut emitted = HashSet::new();
        assert_eq!(disambiguate("Side", &mut emitted), "Side");
        assert_eq!(disambiguate("Side", &mut emitted), "SideStruct");
        assert_eq!(disambiguate("Side", &mut emitted), "SideStructStruct");
    }
}
