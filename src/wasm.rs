use serde::Serialize;
use solana_pubkey::Pubkey;
use wasm_bindgen::prelude::*;

use crate::instruction::InstructionKind;
use crate::parser::parse_transaction;
use crate::programs::{self, Program};
use crate::types::ParsedTransaction;
use crate::validation::{ValidationIssue, validate_transaction};

fn to_js<T: Serialize>(value: &T) -> JsValue {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    match value.serialize(&serializer) {
        Ok(js) => js,
        Err(e) => error_result(&format!("Serialization error: {e}")),
    }
}

fn error_result(msg: &str) -> JsValue {
    let serializer = serde_wasm_bindgen::Serializer::json_compatible();
    serde_json::json!({ "error": msg })
        .serialize(&serializer)
        .unwrap_or(JsValue::NULL)
}

#[derive(Serialize)]
struct Validated {
    transaction: ParsedTransaction,
    issues: Vec<ValidationIssue>,
}

fn parse_pubkey(s: &str) -> Option<Pubkey> {
    s.parse::<Pubkey>().ok()
}

/// Decode a base64 transaction and return its Raydium actions.
#[wasm_bindgen]
pub fn parse_transaction_js(encoded: &str, slot: u64) -> JsValue {
    match parse_transaction(encoded, slot) {
        Ok(tx) => to_js(&tx),
        Err(e) => error_result(&e.to_string()),
    }
}

/// Decode a base64 transaction and return the issues found in it.
#[wasm_bindgen]
pub fn validate_transaction_js(encoded: &str, slot: u64) -> JsValue {
    match parse_transaction(encoded, slot) {
        Ok(tx) => to_js(&Validated {
            issues: validate_transaction(&tx),
            transaction: tx,
        }),
        Err(e) => error_result(&e.to_string()),
    }
}

#[wasm_bindgen]
pub fn is_base_currency_js(mint: &str) -> bool {
    parse_pubkey(mint).is_some_and(|mint| programs::is_base_currency(&mint))
}

#[wasm_bindgen]
pub fn is_known_program_js(program_id: &str) -> bool {
    parse_pubkey(program_id).is_some_and(|id| programs::is_known_program(&id))
}

/// Returns every known program with the instruction kinds it can decode.
#[wasm_bindgen]
pub fn get_all_programs() -> JsValue {
    let result: Vec<serde_json::Value> = Program::ALL
        .iter()
        .map(|program| {
            let instructions: serde_json::Map<String, serde_json::Value> = InstructionKind::ALL
                .iter()
                .filter(|kind| kind.program() == *program)
                .map(|kind| {
                    (
                        kind.as_str().to_string(),
                        serde_json::json!({
                            "opcode": kind.opcode(),
                            "accounts": kind.account_count(),
                        }),
                    )
                })
                .collect();
            serde_json::json!({
                "id": program.as_ref(),
                "programId": program.program_id().to_string(),
                "isAmm": program.is_amm(),
                "instructions": instructions,
            })
        })
        .collect();
    to_js(&result)
}
