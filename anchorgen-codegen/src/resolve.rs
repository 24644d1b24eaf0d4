//! Type resolver (§4, Non-goals, §9 "Open Questions").
//!
//! Maps an IDL `Type` to a Go type expression. u256/i256, generic defined
//! types, generic array lengths and `HashMap` are all *modeled* by the AST
//! but rejected here rather than silently miscompiled or panicking
//! mid-emit, per the spec's "Open Questions" resolution.

use crate::context::GenContext;
use crate::error::GenError;
use crate::naming::to_pascal_case;
use anchorgen_idl::types::*;

pub fn go_type(ctx: &GenContext, ty: &Type) -> Result<String, GenError> {
    Ok(match ty {
        Type::Simple(simple) => go_simple_type(*simple)?,
        Type::Option { option } => format!("*{}", go_type(ctx, option)?),
        Type::Vec { vec } => format!("[]{}", go_type(ctx, vec)?),
        Type::Array { array } => {
            let (elem, len) = array;
            let n = match len {
                ArrayLen::Literal(n) => *n,
                ArrayLen::Generic { .. } | ArrayLen::GenericBare(_) => {
                    return Err(GenError::Unsupported {
                        node: "array length".to_string(),
                        feature: "generic array length".to_string(),
                    })
                }
            };
            format!("[{n}]{}", go_type(ctx, elem)?)
        }
        Type::Defined { defined } => {
            if !defined.generics.is_empty() {
                return Err(GenError::Unsupported {
                    node: defined.name.clone(),
                    feature: "generic parameters on a defined-type reference".to_string(),
                });
            }
            to_pascal_case(&defined.name)
        }
        Type::Generic { generic } => {
            return Err(GenError::Unsupported {
                node: generic.clone(),
                feature: "generic type parameter".to_string(),
            })
        }
        Type::HashMap { .. } => {
            return Err(GenError::Unsupported {
                node: "hashMap".to_string(),
                feature: "HashMap serialization".to_string(),
            })
        }
    })
}

pub fn go_simple_type(simple: Simple) -> Result<String, GenError> {
    Ok(match simple {
        Simple::Bool => "bool".to_string(),
        Simple::U8 => "uint8".to_string(),
        Simple::I8 => "int8".to_string(),
        Simple::U16 => "uint16".to_string(),
        Simple::I16 => "int16".to_string(),
        Simple::U32 => "uint32".to_string(),
        Simple::I32 => "int32".to_string(),
        Simple::U64 => "uint64".to_string(),
        Simple::I64 => "int64".to_string(),
        Simple::U128 => "ag_binary.Uint128".to_string(),
        Simple::I128 => "ag_binary.Int128".to_string(),
        Simple::U256 | Simple::I256 => {
            return Err(GenError::Unsupported {
                node: simple.as_str().to_string(),
                feature: "256-bit integers".to_string(),
            })
        }
        Simple::Bytes => "[]byte".to_string(),
        Simple::String => "string".to_string(),
        Simple::Pubkey => "ag_solanago.PublicKey".to_string(),
    })
}

/// Whether a field's static type is a complex-enum reference (§4.4,
/// §9 "Complex-enum field indirection" — such a field is never wrapped in
/// an `Option`/pointer indirection regardless of IDL optionality, because
/// the marker abstraction's nil value already stands for absence).
pub fn is_complex_enum_field(ctx: &GenContext, ty: &Type) -> bool {
    match ty {
        Type::Defined { defined } => ctx.is_complex_enum(&defined.name),
        Type::Option { option } => is_complex_enum_field(ctx, option),
        _ => false,
    }
}

/// Reject a HashMap or other unsupported construct appearing anywhere
/// inside a type, independent of whether it is the top-level shape. Called
/// eagerly at Context Builder time so the failure surfaces before any file
/// is partially emitted.
pub fn reject_unsupported(ty: &Type) -> Result<(), GenError> {
    match ty {
        Type::Simple(Simple::U256) | Type::Simple(Simple::I256) => Err(GenError::Unsupported {
            node: "u256/i256".to_string(),
            feature: "256-bit integers".to_string(),
        }),
        Type::HashMap { .. } => Err(GenError::Unsupported {
            node: "hashMap".to_string(),
            feature: "HashMap serialization".to_string(),
        }),
        Type::Generic { generic } => Err(GenError::Unsupported {
            node: generic.clone(),
            feature: "generic type parameter".to_string(),
        }),
        Type::Option { option } => reject_unsupported(option),
        Type::Vec { vec } => reject_unsupported(vec),
        Type::Array { array } => reject_unsupported(&array.0),
        Type::Defined { defined } if !defined.generics.is_empty() => Err(GenError::Unsupported {
            node: defined.name.clone(),
            feature: "generic parameters on a defined-type reference".to_string(),
        }),
        Type::Defined { .. } | Type::Simple(_) => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::GenContext;

    fn empty_ctx() -> GenContext {
        let idl = Idl {
            address: None,
            metadata: Metadata {
                name: "example".into(),
                version: None,
                spec: None,
                description: None,
                repository: None,
                address: None,
                dependencies: None,
            },
            docs: vec![],
            instructions: vec![],
            accounts: vec![],
            events: vec![],
            errors: vec![],
            types: vec![],
            constants: vec![],
        };
        GenContext::build(&idl).unwrap()
    }

    #[test]
    fn maps_simple_types() {
        let ctx = empty_ctx();
        assert_eq!(go_type(&ctx, &Type::Simple(Simple::U64)).unwrap(), "uint64");
        assert_eq!(go_type(&ctx, &Type::Simple(Simple::Pubkey)).unwrap(), "ag_solanago.PublicKey");
    }

    #[test]
    fn rejects_256_bit_integers() {
        let ctx = empty_ctx();
        assert!(go_type(&ctx, &Type::Simple(Simple::U256)).is_err());
    }

    #[test]
    fn rejects_hashmap() {
        let ctx = empty_ctx();
        let ty = Type::HashMap {
            hash_map: (Box::new(Type::Simple(Simple::U64)), Box::new(Type::Simple(Simple::U64))),
        };
        assert!(go_type(&ctx, &ty).is_err());
    }

    #[test]
    fn option_wraps_in_pointer() {
        let ctx = empty_ctx();
        let ty = Type::Option { option: Box::new(Type::Simple(Simple::U32)) };
        assert_eq!(go_type(&ctx, &ty).unwrap(), "*uint32");
    }
}
