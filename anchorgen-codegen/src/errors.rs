//! Custom error registry emission (§4.10).

use crate::naming::error_value_name;
use anchorgen_idl::types::ErrorCode;

/// Emits one constructed error value per declared code, an `Errors` map
/// keyed by code, and `DecodeCustomError` which introspects a standard
/// JSON-RPC error shape for `InstructionError[1].Custom`.
pub fn emit_errors(errors: &[ErrorCode]) -> String {
    let mut out = String::new();

    out.push_str("type Error struct {\n\tCode uint32\n\tName string\n\tMsg  string\n}\n\n");
    out.push_str("func (e *Error) Error() string {\n\tif e.Msg != \"\" {\n\t\treturn fmt.Sprintf(\"%s: %s\", e.Name, e.Msg)\n\t}\n\treturn e.Name\n}\n\n");

    for err in errors {
        let value_name = error_value_name(&err.name);
        out.push_str(&format!(
            "var {value_name} = &Error{{Code: {code}, Name: \"{name}\", Msg: \"{msg}\"}}\n",
            value_name = value_name,
            code = err.code,
            name = err.name,
            msg = err.msg.clone().unwrap_or_default().replace('"', "\\\""),
        ));
    }
    out.push('\n');

    out.push_str("var Errors = map[uint32]*Error{\n");
    for err in errors {
        out.push_str(&format!("\t{}: {},\n", err.code, error_value_name(&err.name)));
    }
    out.push_str("}\n\n");

    out.push_str(
        "// DecodeCustomError extracts the numeric code from a standard\n// JSON-RPC `InstructionError` shape and returns the matching registered\n// error, if any.\nfunc DecodeCustomError(rpcErr error) (*Error, bool) {\n\tvar details struct {\n\t\tInstructionError []json.RawMessage `json:\"InstructionError\"`\n\t}\n\tvar wrapper struct {\n\t\tData struct {\n\t\t\tErr json.RawMessage `json:\"err\"`\n\t\t} `json:\"data\"`\n\t}\n\tif err := json.Unmarshal([]byte(rpcErr.Error()), &wrapper); err != nil {\n\t\treturn nil, false\n\t}\n\tif err := json.Unmarshal(wrapper.Data.Err, &details); err != nil {\n\t\treturn nil, false\n\t}\n\tif len(details.InstructionError) < 2 {\n\t\treturn nil, false\n\t}\n\tvar custom struct {\n\t\tCustom uint32 `json:\"Custom\"`\n\t}\n\tif err := json.Unmarshal(details.InstructionError[1], &custom); err != nil {\n\t\treturn nil, false\n\t}\n\tmatched, ok := Errors[custom.Custom]\n\treturn matched, ok\n}\n",
    );

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emits_one_value_per_error() {
        let errors = vec![
            ErrorCode { code: 6000, name: "Unauthorized".into(), msg: Some("not allowed".into()) },
            ErrorCode { code: 6001, name: "Overflow".into(), msg: None },
        ];
        let src = emit_errors(&errors);
        assert!(src.contains("var ErrUnauthorized = &Error{Code: 6000"));
        assert!(src.contains("6001: ErrOverflow"));
        assert!(src.contains("func DecodeCustomError"));
    }
}
