//! IDL loading.

use crate::error::IdlError;
use crate::types::Idl;
use std::path::Path;

pub fn parse_idl_file<P: AsRef<Path>>(path: P) -> Result<Idl, IdlError> {
    let content = std::fs::read_to_string(&path)
        .map_err(|e| IdlError::io(path.as_ref().to_path_buf(), e))?;
    parse_idl_content(&content)
}

pub fn parse_idl_content(content: &str) -> Result<Idl, IdlError> {
    let idl: Idl = serde_json::from_str(content).map_err(|source| IdlError::Parse { source })?;
    tracing::debug!(program = %idl.metadata.name, "parsed IDL");
    Ok(idl)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discriminator::instruction_sighash;

    #[test]
    fn minimal_idl_parses() {
        let json = r#"{
            "address": "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8",
            "metadata": { "name": "example", "version": "0.1.0", "spec": "0.31.1" },
            "instructions": [
                {
                    "name": "initialize",
                    "accounts": [
                        { "name": "payer", "writable": true, "signer": true }
                    ],
                    "args": [
                        { "name": "amount", "type": "u64" }
                    ]
                }
            ],
            "accounts": [],
            "types": [],
            "errors": []
        }"#;
        let idl = parse_idl_content(json).expect("should parse");
        assert_eq!(idl.instructions.len(), 1);
        assert_eq!(idl.instructions[0].accounts.len(), 1);
    }

    #[test]
    fn instruction_without_discriminator_falls_back_to_sighash() {
        let json = r#"{
            "metadata": { "name": "example" },
            "instructions": [
                { "name": "initialize", "accounts": [], "args": [] }
            ],
            "accounts": [], "types": [], "errors": []
        }"#;
        let idl = parse_idl_content(json).unwrap();
        assert!(idl.instructions[0].discriminator.is_none());
        assert!(idl.instructions[0].discriminant.is_none());
        assert_eq!(instruction_sighash("initialize").len(), 8);
    }

    #[test]
    fn explicit_discriminator_roundtrips() {
        let json = r#"{
            "metadata": { "name": "example" },
            "instructions": [
                {
                    "name": "init",
                    "discriminator": [1,2,3,4,5,6,7,8],
                    "accounts": [], "args": []
                }
            ],
            "accounts": [], "types": [], "errors": []
        }"#;
        let idl = parse_idl_content(json).unwrap();
        assert_eq!(
            idl.instructions[0].discriminator,
            Some(vec![1, 2, 3, 4, 5, 6, 7, 8])
        );
    }

    #[test]
    fn steel_discriminant_parses() {
        let json = r#"{
            "metadata": { "name": "example" },
            "instructions": [
                {
                    "name": "create",
                    "discriminant": { "kind": "u8", "value": 3 },
                    "accounts": [], "args": []
                }
            ],
            "accounts": [], "types": [], "errors": []
        }"#;
        let idl = parse_idl_content(json).unwrap();
        let discriminant = idl.instructions[0].discriminant.as_ref().unwrap();
        assert_eq!(discriminant.value, 3);
    }

    #[test]
    fn nested_account_group_parses() {
        let json = r#"{
            "metadata": { "name": "example" },
            "instructions": [
                {
                    "name": "swap",
                    "accounts": [
                        { "name": "payer", "signer": true },
                        {
                            "name": "pool",
                            "accounts": [
                                { "name": "vaultA", "writable": true },
                                { "name": "vaultB", "writable": true }
                            ]
                        }
                    ],
                    "args": []
                }
            ],
            "accounts": [], "types": [], "errors": []
        }"#;
        let idl = parse_idl_content(json).unwrap();
        assert_eq!(idl.instructions[0].accounts.len(), 2);
    }

    #[test]
    fn pda_with_const_and_account_seeds_parses() {
        let json = r#"{
            "metadata": { "name": "example" },
            "instructions": [
                {
                    "name": "init_vault",
                    "accounts": [
                        {
                            "name": "vault",
                            "writable": true,
                            "pda": {
                                "seeds": [
                                    { "kind": "const", "value": [118, 97, 117, 108, 116] },
                                    { "kind": "account", "path": "owner" }
                                ]
                            }
                        },
                        { "name": "owner", "signer": true }
                    ],
                    "args": []
                }
            ],
            "accounts": [], "types": [], "errors": []
        }"#;
        let idl = parse_idl_content(json).unwrap();
        match &idl.instructions[0].accounts[0] {
            crate::types::AccountItem::Leaf(acc) => {
                assert!(acc.pda.is_some());
                assert_eq!(acc.pda.as_ref().unwrap().seeds.len(), 2);
            }
            _ => panic!("expected leaf account"),
        }
    }

    #[test]
    fn complex_enum_type_parses() {
        let json = r#"{
            "metadata": { "name": "example" },
            "instructions": [], "accounts": [], "errors": [],
            "types": [
                {
                    "name": "Op",
                    "type": {
                        "kind": "enum",
                        "variants": [
                            { "name": "Nop" },
                            { "name": "Add", "fields": [ { "name": "x", "type": "u64" } ] }
                        ]
                    }
                }
            ]
        }"#;
        let idl = parse_idl_content(json).unwrap();
        match &idl.types[0].body {
            crate::types::TypeDefKind::Enum { variants } => {
                assert!(variants[0].is_scalar());
                assert!(!variants[1].is_scalar());
            }
            _ => panic!("expected enum"),
        }
    }

    #[test]
    fn tuple_struct_type_parses() {
        let json = r#"{
            "metadata": { "name": "example" },
            "instructions": [], "accounts": [], "errors": [],
            "types": [
                {
                    "name": "Wrapper",
                    "type": { "kind": "struct", "fields": [ "u64", "pubkey" ] }
                }
            ]
        }"#;
        let idl = parse_idl_content(json).unwrap();
        match &idl.types[0].body {
            crate::types::TypeDefKind::Struct { fields: Some(crate::types::DefinedFields::Tuple(tys)) } => {
                assert_eq!(tys.len(), 2);
            }
            other => panic!("expected tuple struct, got {other:?}"),
        }
    }

    #[test]
    fn array_type_parses() {
        let json = r#"{
            "metadata": { "name": "example" },
            "instructions": [], "accounts": [], "errors": [],
            "types": [
                {
                    "name": "Fixed",
                    "type": { "kind": "struct", "fields": [ { "name": "data", "type": { "array": ["u8", 32] } } ] }
                }
            ]
        }"#;
        let idl = parse_idl_content(json).unwrap();
        match &idl.types[0].body {
            crate::types::TypeDefKind::Struct { fields: Some(crate::types::DefinedFields::Named(fields)) } => {
                match &fields[0].ty {
                    crate::types::Type::Array { array } => {
                        assert!(matches!(array.1, crate::types::ArrayLen::Literal(32)));
                    }
                    other => panic!("expected array type, got {other:?}"),
                }
            }
            other => panic!("expected named struct, got {other:?}"),
        }
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = parse_idl_content("{ not json").unwrap_err();
        assert!(matches!(err, IdlError::Parse { .. }));
    }
}
