//! Event emission and log/inner-instruction decoding (§4.10).

use crate::context::GenContext;
use crate::error::GenError;
use crate::naming::event_data_struct_name;
use crate::structs::{EncodeDecodeSpec, OptionPolicy};
use anchorgen_idl::discriminator::event_sighash;
use anchorgen_idl::types::*;

/// Emits one `<Name>EventData` struct with its encode/decode methods. Field
/// layout is looked up from the `types` entry sharing the event's name, the
/// same convention accounts use (§4.10).
pub fn emit_event(ctx: &mut GenContext, event: &Event) -> Result<String, GenError> {
    let struct_name = ctx.disambiguate(&event_data_struct_name(&event.name));
    ctx.mark_emitted(struct_name.clone());

    let type_def = ctx.lookup_type(&event.name).ok_or_else(|| GenError::Resolution {
        path: event.name.clone(),
        suggestion: None,
    })?;
    let named_fields = match &type_def.body {
        TypeDefKind::Struct { fields } => fields.clone(),
        _ => {
            return Err(GenError::Unsupported {
                node: event.name.clone(),
                feature: "non-struct event data type".to_string(),
            })
        }
    };
    let fields = crate::structs::fields_from_defined(&named_fields);

    let discriminator = event
        .discriminator
        .clone()
        .map(|bytes| {
            let mut out = [0u8; 8];
            let n = bytes.len().min(8);
            out[..n].copy_from_slice(&bytes[..n]);
            out
        })
        .unwrap_or_else(|| event_sighash(&event.name));

    let mut out = String::new();
    for doc in &event.docs {
        out.push_str(&format!("// {doc}\n"));
    }
    out.push_str(&format!("type {struct_name} struct {{\n"));
    out.push_str(&crate::structs::render_fields(ctx, &fields)?);
    out.push_str("}\n\n");

    let spec = EncodeDecodeSpec {
        struct_name: &struct_name,
        fields: &fields,
        discriminator: Some(discriminator),
        option_policy: OptionPolicy::NullChecked,
    };
    out.push_str(&crate::structs::emit_encode_decode(ctx, &spec)?);
    out.push('\n');
    Ok(out)
}

/// The two global lookup tables plus `DecodeEvents`, as described in §4.10:
/// payloads come either from `Program data: ` log lines (base64) or from
/// inner instructions addressed to the program (selector-stripped).
pub fn emit_event_registry(events: &[Event]) -> String {
    let mut out = String::new();

    out.push_str("var eventTypes = map[[8]byte]reflect.Type{\n");
    for event in events {
        out.push_str(&format!(
            "\t{disc}: reflect.TypeOf({struct_name}{{}}),\n",
            disc = discriminator_literal(event),
            struct_name = event_data_struct_name(&event.name),
        ));
    }
    out.push_str("}\n\n");

    out.push_str("var eventNames = map[[8]byte]string{\n");
    for event in events {
        out.push_str(&format!(
            "\t{disc}: \"{name}\",\n",
            disc = discriminator_literal(event),
            name = event.name,
        ));
    }
    out.push_str("}\n\n");

    out.push_str(
        "type DecodedEvent struct {\n\tName string\n\tData interface{}\n}\n\n",
    );

    out.push_str(&format!(
        "// DecodeEvents extracts every event payload from a transaction's log\n// lines and inner instructions addressed to {{ProgramID}}.\nfunc DecodeEvents(logs []string, innerInstructions []ag_solanago.CompiledInstruction) ([]DecodedEvent, error) {{\n\tvar out []DecodedEvent\n\tfor _, line := range logs {{\n\t\tconst prefix = \"Program data: \"\n\t\tif !strings.HasPrefix(line, prefix) {{\n\t\t\tcontinue\n\t\t}}\n\t\tpayload, err := base64.StdEncoding.DecodeString(strings.TrimPrefix(line, prefix))\n\t\tif err != nil {{\n\t\t\tcontinue\n\t\t}}\n\t\tif decoded, ok, err := decodeEventPayload(payload); err != nil {{\n\t\t\treturn nil, err\n\t\t}} else if ok {{\n\t\t\tout = append(out, decoded)\n\t\t}}\n\t}}\n\tfor _, ix := range innerInstructions {{\n\t\tif len(ix.Data) < 8 {{\n\t\t\tcontinue\n\t\t}}\n\t\tif decoded, ok, err := decodeEventPayload(ix.Data[8:]); err != nil {{\n\t\t\treturn nil, err\n\t\t}} else if ok {{\n\t\t\tout = append(out, decoded)\n\t\t}}\n\t}}\n\treturn out, nil\n}}\n\n"
    ));

    out.push_str(
        "func decodeEventPayload(payload []byte) (DecodedEvent, bool, error) {\n\tif len(payload) < 8 {\n\t\treturn DecodedEvent{}, false, nil\n\t}\n\tvar disc [8]byte\n\tcopy(disc[:], payload[:8])\n\ttyp, ok := eventTypes[disc]\n\tif !ok {\n\t\treturn DecodedEvent{}, false, nil\n\t}\n\tdata := reflect.New(typ).Interface()\n\tif err := ag_binary.NewBorshDecoder(payload).Decode(data); err != nil {\n\t\treturn DecodedEvent{}, false, err\n\t}\n\treturn DecodedEvent{Name: eventNames[disc], Data: data}, true, nil\n}\n",
    );

    out
}

fn discriminator_literal(event: &Event) -> String {
    let bytes = event
        .discriminator
        .clone()
        .map(|b| {
            let mut out = [0u8; 8];
            let n = b.len().min(8);
            out[..n].copy_from_slice(&b[..n]);
            out
        })
        .unwrap_or_else(|| event_sighash(&event.name));
    format!(
        "[8]byte{{{}}}",
        bytes.iter().map(|b| b.to_string()).collect::<Vec<_>>().join(", ")
    )
}
