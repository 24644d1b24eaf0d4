//! End-to-end parse fixtures covering the tagging conventions of §4.1.

use anchorgen_idl::parse::parse_idl_content;
use anchorgen_idl::types::*;

const ANCHOR_STYLE_IDL: &str = r#"{
    "address": "675kPX9MHTjS2zt1qfr1NYHuzeLXfQM9H24wFSUt1Mp8",
    "metadata": { "name": "escrow", "version": "0.1.0", "spec": "0.31.1" },
    "instructions": [
        {
            "name": "initialize",
            "discriminator": [175, 175, 109, 31, 13, 152, 155, 237],
            "accounts": [
                { "name": "payer", "writable": true, "signer": true },
                { "name": "systemProgram", "address": "11111111111111111111111111111111" }
            ],
            "args": [
                { "name": "amount", "type": "u64" },
                { "name": "side", "type": { "defined": { "name": "Side" } } }
            ]
        }
    ],
    "accounts": [
        {
            "name": "Escrow",
            "discriminator": [31, 213, 123, 15, 39, 20, 99, 1]
        }
    ],
    "types": [
        {
            "name": "Side",
            "type": { "kind": "enum", "variants": [ { "name": "Buy" }, { "name": "Sell" } ] }
        },
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
    ],
    "events": [
        { "name": "TradeExecuted" }
    ],
    "errors": [
        { "code": 6000, "name": "InsufficientFunds", "msg": "not enough funds" }
    ],
    "constants": [
        { "name": "MAX_SIDE", "type": "u8", "value": "1" }
    ]
}"#;

#[test]
fn anchor_style_idl_round_trips() {
    let idl = parse_idl_content(ANCHOR_STYLE_IDL).expect("should parse");

    assert_eq!(idl.metadata.name, "escrow");
    assert_eq!(idl.instructions.len(), 1);
    assert_eq!(
        idl.instructions[0].discriminator,
        Some(vec![175, 175, 109, 31, 13, 152, 155, 237])
    );
    assert_eq!(idl.types.len(), 2);
    assert_eq!(idl.events.len(), 1);
    assert_eq!(idl.errors[0].code, 6000);
    assert_eq!(idl.constants[0].value, "1");

    let scalar = match &idl.types[0].body {
        TypeDefKind::Enum { variants } => variants.iter().all(|v| v.is_scalar()),
        _ => false,
    };
    assert!(scalar, "Side must classify as a scalar enum");

    let complex = match &idl.types[1].body {
        TypeDefKind::Enum { variants } => variants.iter().any(|v| !v.is_scalar()),
        _ => false,
    };
    assert!(complex, "Op must classify as a complex enum");
}

#[test]
fn unknown_tag_value_is_rejected() {
    let json = r#"{
        "metadata": { "name": "bad" },
        "instructions": [
            {
                "name": "init",
                "accounts": [
                    {
                        "name": "vault",
                        "pda": { "seeds": [ { "kind": "weird", "value": [1] } ] }
                    }
                ],
                "args": []
            }
        ],
        "accounts": [], "types": [], "errors": []
    }"#;
    assert!(parse_idl_content(json).is_err());
}
