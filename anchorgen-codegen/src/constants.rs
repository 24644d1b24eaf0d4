//! Constant emission (§4.11).
//!
//! Each constant's string value is decoded per its declared simple type at
//! generation time, not deferred to the emitted Go's `init()` — the Go
//! source carries the already-typed literal.

use crate::error::GenError;
use crate::naming::const_var_name;
use crate::resolve::go_simple_type;
use anchorgen_idl::types::*;
use num_bigint::BigInt;

pub fn emit_constants(constants: &[Constant]) -> Result<String, GenError> {
    let mut out = String::new();
    for constant in constants {
        out.push_str(&emit_constant(constant)?);
    }
    Ok(out)
}

fn emit_constant(constant: &Constant) -> Result<String, GenError> {
    let simple = match &constant.ty {
        Type::Simple(simple) => *simple,
        other => {
            let _ = other;
            return Err(GenError::Unsupported {
                node: constant.name.clone(),
                feature: "non-simple constant type".to_string(),
            });
        }
    };

    let var_name = const_var_name(&constant.name);
    let go_type = go_simple_type(simple)?;
    let literal = decode_constant_value(&constant.name, simple, &constant.value)?;

    let mut out = String::new();
    for doc in &constant.docs {
        out.push_str(&format!("// {doc}\n"));
    }
    out.push_str(&format!("var {var_name} {go_type} = {literal}\n"));
    Ok(out)
}

/// Decodes a constant's string value per its declared simple type (§4.11):
/// strings are unquoted, booleans parsed case-insensitively, integers per
/// bit-width, `pubkey` via base58, `bytes` via a decimal-list parse, and
/// `u128` via a big-integer decode.
fn decode_constant_value(name: &str, simple: Simple, value: &str) -> Result<String, GenError> {
    Ok(match simple {
        Simple::Bool => {
            let parsed: bool = value.to_ascii_lowercase().parse().map_err(|_| GenError::Unsupported {
                node: name.to_string(),
                feature: "malformed bool constant".to_string(),
            })?;
            parsed.to_string()
        }
        Simple::U8 | Simple::I8 | Simple::U16 | Simple::I16 | Simple::U32 | Simple::I32
        | Simple::U64 | Simple::I64 => value.trim().to_string(),
        Simple::U128 | Simple::I128 => {
            let parsed: BigInt = value.trim().parse().map_err(|_| GenError::Unsupported {
                node: name.to_string(),
                feature: "malformed u128/i128 constant".to_string(),
            })?;
            format!("ag_binary.Uint128FromBigInt(big.NewInt({parsed}))")
        }
        Simple::U256 | Simple::I256 => {
            return Err(GenError::Unsupported {
                node: name.to_string(),
                feature: "256-bit integers".to_string(),
            })
        }
        Simple::Bytes => {
            let bytes: Result<Vec<String>, _> = value
                .trim_matches(|c| c == '[' || c == ']')
                .split(',')
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.trim().parse::<u8>().map(|b| b.to_string()))
                .collect();
            let bytes = bytes.map_err(|_| GenError::Unsupported {
                node: name.to_string(),
                feature: "malformed bytes constant".to_string(),
            })?;
            format!("[]byte{{{}}}", bytes.join(", "))
        }
        Simple::String => format!("{:?}", value.trim_matches('"')),
        Simple::Pubkey => format!("ag_solanago.MustPublicKeyFromBase58({value:?})"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_each_simple_kind() {
        assert_eq!(decode_constant_value("x", Simple::U64, "42").unwrap(), "42");
        assert_eq!(decode_constant_value("x", Simple::Bool, "TRUE").unwrap(), "true");
        assert_eq!(decode_constant_value("x", Simple::String, "\"hi\"").unwrap(), "\"hi\"");
        assert_eq!(
            decode_constant_value("x", Simple::Bytes, "[1, 2, 3]").unwrap(),
            "[]byte{1, 2, 3}"
        );
    }

    #[test]
    fn rejects_256_bit_constant() {
        assert!(decode_constant_value("x", Simple::U256, "1").is_err());
    }

    #[test]
    fn emits_named_var() {
        let constant = Constant {
            name: "MAX_SUPPLY".into(), docs: vec![], ty: Type::Simple(Simple::U64), value: "1000".into(),
        };
        let src = emit_constant(&constant).unwrap();
        assert_eq!(src.trim(), "var CONST_MAX_SUPPLY uint64 = 1000");
    }
}
