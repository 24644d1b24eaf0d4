//! Address table emission (§4.11).
//!
//! One `map[string]ag_solanago.PublicKey`, populated from every base58
//! address the context interned during emission (fixed account addresses,
//! const PDA program seeds) — never hand-maintained, always derived.

use crate::context::GenContext;

pub fn emit_addresses(ctx: &GenContext) -> String {
    let mut out = String::new();
    out.push_str("var Addresses = map[string]ag_solanago.PublicKey{\n");
    for address in ctx.addresses() {
        out.push_str(&format!(
            "\t\"{address}\": ag_solanago.MustPublicKeyFromBase58(\"{address}\"),\n"
        ));
    }
    out.push_str("}\n");
    out
}
