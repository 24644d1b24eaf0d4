//! Core IDL AST.
//!
//! All nodes are persistent, created once at load, and read-only thereafter.
//! Discriminated unions follow the JSON's own ad-hoc tagging: some nodes
//! carry an explicit `kind` field (`Seed`, `TypeDefKind`, `Repr`), others are
//! distinguished purely by which key is present (`Type`, `ArrayLen`,
//! `DefinedFields`, `AccountItem`).

use serde::{Deserialize, Serialize};
use std::collections::HashMap as StdHashMap;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Idl {
    #[serde(default)]
    pub address: Option<String>,
    pub metadata: Metadata,
    #[serde(default)]
    pub docs: Vec<String>,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
    #[serde(default)]
    pub accounts: Vec<AccountDef>,
    #[serde(default)]
    pub events: Vec<Event>,
    #[serde(default)]
    pub errors: Vec<ErrorCode>,
    #[serde(default)]
    pub types: Vec<TypeDef>,
    #[serde(default)]
    pub constants: Vec<Constant>,
}

impl Idl {
    /// Falls back to the program's on-chain address when `metadata.name` is
    /// blank, matching older IDLs that carried no name at all.
    pub fn program_name(&self) -> String {
        if !self.metadata.name.is_empty() {
            return self.metadata.name.clone();
        }
        if let Some(address) = &self.address {
            return address.clone();
        }
        "program".to_string()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Metadata {
    pub name: String,
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub spec: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub repository: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub dependencies: Option<StdHashMap<String, serde_json::Value>>,
}

/// Exactly one of `discriminator`/`discriminant` may be present (enforced
/// at the `Discriminator` derivation step, not at parse time: the JSON is
/// permitted to be silent on both, in which case the default sighash
/// applies).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Instruction {
    pub name: String,
    #[serde(default)]
    pub docs: Vec<String>,
    #[serde(default)]
    pub discriminator: Option<Vec<u8>>,
    #[serde(default)]
    pub discriminant: Option<Discriminant>,
    #[serde(default)]
    pub accounts: Vec<AccountItem>,
    #[serde(default)]
    pub args: Vec<Field>,
    #[serde(default)]
    pub returns: Option<Type>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Discriminant {
    pub kind: DiscriminantKind,
    pub value: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DiscriminantKind {
    U8,
    U32,
    Uvarint32,
}

/// Discriminated by presence of the `accounts` key: a node carrying it is a
/// nested group, otherwise it is a leaf account.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum AccountItem {
    Group(AccountGroup),
    Leaf(Account),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountGroup {
    pub name: String,
    #[serde(default)]
    pub docs: Vec<String>,
    pub accounts: Vec<AccountItem>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Account {
    pub name: String,
    #[serde(default)]
    pub docs: Vec<String>,
    #[serde(default, rename = "writable")]
    pub writable: bool,
    #[serde(default)]
    pub signer: bool,
    #[serde(default)]
    pub optional: bool,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub pda: Option<Pda>,
}

/// A top-level on-chain account (`Idl.accounts`), distinct from the
/// instruction-meta `Account` leaf: its field layout lives in the `types`
/// entry of the same name (standard Anchor convention), and it carries its
/// own discriminator.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AccountDef {
    pub name: String,
    #[serde(default)]
    pub docs: Vec<String>,
    #[serde(default)]
    pub discriminator: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Pda {
    pub seeds: Vec<Seed>,
    #[serde(default)]
    pub program: Option<Seed>,
}

/// Tagged by `kind` (`const`/`arg`/`account`), each with a distinct payload
/// shape. `Account.account` is the optional type-name qualifier used when
/// the path resolves through a typed account's fields (§4.7).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Seed {
    Const { value: Vec<u8> },
    Arg { path: String },
    Account {
        path: String,
        #[serde(default)]
        account: Option<String>,
    },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Field {
    pub name: String,
    #[serde(default)]
    pub docs: Vec<String>,
    #[serde(rename = "type")]
    pub ty: Type,
}

/// Discriminated by which key is present: a bare JSON string is `Simple`;
/// an object is dispatched on its single recognized key. `array` and
/// `hashMap` each carry a two-element JSON array/tuple.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum Type {
    Simple(Simple),
    Option {
        option: Box<Type>,
    },
    Vec {
        vec: Box<Type>,
    },
    Array {
        array: (Box<Type>, ArrayLen),
    },
    Defined {
        defined: DefinedRef,
    },
    Generic {
        generic: String,
    },
    HashMap {
        #[serde(rename = "hashMap")]
        hash_map: (Box<Type>, Box<Type>),
    },
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct DefinedRef {
    pub name: String,
    #[serde(default)]
    pub generics: Vec<GenericArg>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum GenericArg {
    Type { #[serde(rename = "type")] ty: Type },
    Const { value: String },
}

/// A JSON number is a literal length; an object with a `generic` key or a
/// bare JSON string names a generic length parameter (unsupported
/// downstream, see `Unsupported::GenericArrayLen`).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ArrayLen {
    Literal(u64),
    Generic { generic: String },
    GenericBare(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub enum Simple {
    #[serde(rename = "bool")]
    Bool,
    #[serde(rename = "u8")]
    U8,
    #[serde(rename = "i8")]
    I8,
    #[serde(rename = "u16")]
    U16,
    #[serde(rename = "i16")]
    I16,
    #[serde(rename = "u32")]
    U32,
    #[serde(rename = "i32")]
    I32,
    #[serde(rename = "u64")]
    U64,
    #[serde(rename = "i64")]
    I64,
    #[serde(rename = "u128")]
    U128,
    #[serde(rename = "i128")]
    I128,
    #[serde(rename = "u256")]
    U256,
    #[serde(rename = "i256")]
    I256,
    #[serde(rename = "bytes")]
    Bytes,
    #[serde(rename = "string")]
    String,
    #[serde(rename = "pubkey")]
    Pubkey,
}

impl Simple {
    pub fn as_str(&self) -> &'static str {
        match self {
            Simple::Bool => "bool",
            Simple::U8 => "u8",
            Simple::I8 => "i8",
            Simple::U16 => "u16",
            Simple::I16 => "i16",
            Simple::U32 => "u32",
            Simple::I32 => "i32",
            Simple::U64 => "u64",
            Simple::I64 => "i64",
            Simple::U128 => "u128",
            Simple::I128 => "i128",
            Simple::U256 => "u256",
            Simple::I256 => "i256",
            Simple::Bytes => "bytes",
            Simple::String => "string",
            Simple::Pubkey => "pubkey",
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TypeDef {
    pub name: String,
    #[serde(default)]
    pub docs: Vec<String>,
    #[serde(default)]
    pub serialization: Option<Serialization>,
    #[serde(default)]
    pub repr: Option<Repr>,
    #[serde(default)]
    pub generics: Vec<String>,
    #[serde(rename = "type")]
    pub body: TypeDefKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Serialization {
    #[default]
    Borsh,
    Bytemuck,
    #[serde(alias = "bytemuckunsafe")]
    BytemuckUnsafe,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Repr {
    Rust {
        #[serde(default)]
        modifier: Option<ReprModifier>,
    },
    C {
        #[serde(default)]
        modifier: Option<ReprModifier>,
    },
    Transparent,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReprModifier {
    #[serde(default)]
    pub packed: bool,
    #[serde(default)]
    pub align: Option<u32>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum TypeDefKind {
    Struct {
        #[serde(default)]
        fields: Option<DefinedFields>,
    },
    Enum {
        variants: Vec<EnumVariant>,
    },
    #[serde(rename = "type")]
    Alias {
        alias: Type,
    },
}

/// Discriminated purely by JSON array shape: if the first element carries a
/// `name` property it is the named form, otherwise each element is parsed
/// as a bare `Type` (tuple form).
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum DefinedFields {
    Named(Vec<Field>),
    Tuple(Vec<Type>),
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EnumVariant {
    pub name: String,
    #[serde(default)]
    pub fields: Option<DefinedFields>,
}

impl EnumVariant {
    pub fn is_scalar(&self) -> bool {
        self.fields.is_none()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Event {
    pub name: String,
    #[serde(default)]
    pub docs: Vec<String>,
    #[serde(default)]
    pub discriminator: Option<Vec<u8>>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Constant {
    pub name: String,
    #[serde(default)]
    pub docs: Vec<String>,
    #[serde(rename = "type")]
    pub ty: Type,
    pub value: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ErrorCode {
    pub code: u32,
    pub name: String,
    #[serde(default)]
    pub msg: Option<String>,
}
