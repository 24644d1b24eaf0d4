//! Generation Context (§3.2).
//!
//! Constructed after load by two registration passes, then handed to
//! emitters which may only *append* to the identifier registry, address
//! table and emitted-identifier set — never replace or remove (§5).

use crate::error::GenError;
use crate::naming::to_snake_case;
use anchorgen_idl::types::*;
use std::collections::{BTreeSet, HashMap, HashSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryEncoding {
    Borsh,
}

pub struct GenContext {
    pub package_ident: String,
    pub program_name: String,
    /// Base58 program id, if declared (top-level `address` or
    /// `metadata.address`). Used as the default program seed (§4.7) when an
    /// instruction's PDA omits one.
    pub program_address: Option<String>,
    pub discriminator_encoding: anchorgen_idl::discriminator::DiscriminatorEncoding,
    pub binary_encoding: BinaryEncoding,
    /// name -> type definition, for `defined` type resolution.
    types_by_name: HashMap<String, TypeDef>,
    /// Names of enums that must become sum types (§4.4).
    complex_enums: HashSet<String>,
    /// Already-emitted top-level identifiers, for §4.2 collision handling.
    emitted_idents: HashSet<String>,
    /// Base58 addresses referenced anywhere in the emitted code, deduped.
    address_table: BTreeSet<String>,
}

impl GenContext {
    /// Two registration passes: (1) index every `TypeDef` by name and
    /// classify enums, (2) derive the program-wide discriminator encoding
    /// from the first instruction (§4.3). Neither pass touches the address
    /// table or emitted-identifier set — those only grow during emission.
    pub fn build(idl: &Idl) -> Result<Self, GenError> {
        let program_name = idl.program_name();
        let package_ident = to_snake_case(&program_name);

        let mut types_by_name = HashMap::new();
        let mut complex_enums = HashSet::new();
        for type_def in &idl.types {
            types_by_name.insert(type_def.name.clone(), type_def.clone());
            if let TypeDefKind::Enum { variants } = &type_def.body {
                if variants.iter().any(|v| !v.is_scalar()) {
                    complex_enums.insert(type_def.name.clone());
                }
            }
        }

        let discriminator_encoding = idl
            .instructions
            .first()
            .map(anchorgen_idl::discriminator::DiscriminatorEncoding::from_instruction)
            .unwrap_or(anchorgen_idl::discriminator::DiscriminatorEncoding::Anchor);

        for (i, instr) in idl.instructions.iter().enumerate() {
            let this_encoding =
                anchorgen_idl::discriminator::DiscriminatorEncoding::from_instruction(instr);
            if i > 0 && this_encoding != discriminator_encoding {
                return Err(GenError::DiscriminatorMismatch {
                    instruction: instr.name.clone(),
                });
            }
        }

        let program_address = idl.address.clone().or_else(|| idl.metadata.address.clone());

        Ok(GenContext {
            package_ident,
            program_name,
            program_address,
            discriminator_encoding,
            binary_encoding: BinaryEncoding::Borsh,
            types_by_name,
            complex_enums,
            emitted_idents: HashSet::new(),
            address_table: BTreeSet::new(),
        })
    }

    pub fn lookup_type(&self, name: &str) -> Option<&TypeDef> {
        self.types_by_name.get(name)
    }

    pub fn is_complex_enum(&self, name: &str) -> bool {
        self.complex_enums.contains(name)
    }

    pub fn disambiguate(&mut self, name: &str) -> String {
        crate::naming::disambiguate(name, &mut self.emitted_idents)
    }

    pub fn mark_emitted(&mut self, name: impl Into<String>) {
        self.emitted_idents.insert(name.into());
    }

    /// Registers an instruction/argument-derived identifier, fatally
    /// rejecting a collision rather than renaming it (§4.2, §7
    /// `NameConflict`: collisions among top-level *types* get the `Struct`
    /// suffix via [`Self::disambiguate`]; collisions among instructions or
    /// args do not get that leniency).
    pub fn claim_identifier(&mut self, name: impl Into<String>) -> Result<(), GenError> {
        let name = name.into();
        if !self.emitted_idents.insert(name.clone()) {
            return Err(GenError::NameConflict { name });
        }
        Ok(())
    }

    pub fn intern_address(&mut self, base58: impl Into<String>) {
        self.address_table.insert(base58.into());
    }

    pub fn addresses(&self) -> impl Iterator<Item = &String> {
        self.address_table.iter()
    }
}
