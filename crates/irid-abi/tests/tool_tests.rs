//! End-to-end tests for the decode/encode entry points

use irid_abi::{decode, encode, AbiDocument, AbiError, EncodeRequest, Token};
use irid_primitives::{Address, U256};

const TRANSFER_CALLDATA: &str = "0xa9059cbb000000000000000000000000d8da6bf26964af9d7eed9e03e53415d37aa960450000000000000000000000000000000000000000000000000de0b6b3a7640000";

const TRANSFER_ABI: &str = r#"[
  {
    "name": "transfer",
    "type": "function",
    "inputs": [
      { "name": "to", "type": "address" },
      { "name": "amount", "type": "uint256" }
    ],
    "outputs": [{ "name": "", "type": "bool" }]
  }
]"#;

const RECIPIENT: &str = "0xd8dA6BF26964aF9D7eEd9e03E53415D37aA96045";

// ==================== Scenario tests ====================

#[test]
fn test_decode_transfer() {
    let call = decode(TRANSFER_CALLDATA, TRANSFER_ABI).unwrap();

    assert_eq!(call.function_name, "transfer");
    assert_eq!(call.selector_hex, "0xa9059cbb");
    assert_eq!(call.signature, "transfer(address,uint256)");
    assert!(call.warnings.is_empty());

    assert_eq!(call.parameters.len(), 2);
    assert_eq!(call.parameters[0].name, "to");
    assert_eq!(call.parameters[0].type_string, "address");
    assert_eq!(
        call.parameters[0].value,
        Token::Address(Address::from_hex(RECIPIENT).unwrap())
    );
    assert_eq!(call.parameters[1].name, "amount");
    assert_eq!(call.parameters[1].type_string, "uint256");
    assert_eq!(
        call.parameters[1].value,
        Token::Uint(U256::from(1_000_000_000_000_000_000u128))
    );
}

#[test]
fn test_decode_transfer_json_rendering() {
    let call = decode(TRANSFER_CALLDATA, TRANSFER_ABI).unwrap();
    let json = serde_json::to_value(&call).unwrap();

    assert_eq!(
        json,
        serde_json::json!({
            "functionName": "transfer",
            "signature": "transfer(address,uint256)",
            "selectorHex": "0xa9059cbb",
            "parameters": [
                { "name": "to", "typeString": "address", "value": RECIPIENT },
                { "name": "amount", "typeString": "uint256", "value": "1000000000000000000" }
            ]
        })
    );
}

#[test]
fn test_encode_transfer() {
    let calldata = encode("transfer(address,uint256)", &[RECIPIENT, "1000000000000000000"]).unwrap();
    assert_eq!(calldata, TRANSFER_CALLDATA);
    // selector + two words
    assert_eq!((calldata.len() - 2) / 2, 68);
}

#[test]
fn test_decode_truncated_head() {
    // Drop the last word
    let short = &TRANSFER_CALLDATA[..TRANSFER_CALLDATA.len() - 64];
    let err = decode(short, TRANSFER_ABI).unwrap_err();
    assert!(matches!(err.root(), AbiError::TruncatedData { .. }), "{:?}", err);
}

#[test]
fn test_encode_arity_mismatch() {
    let err = encode("transfer(address,uint256)", &[RECIPIENT, "1", "2"]).unwrap_err();
    assert_eq!(err, AbiError::Arity { expected: 2, got: 3 });
}

#[test]
fn test_encode_uint8_out_of_range() {
    let err = encode("setLevel(uint8)", &["300"]).unwrap_err();
    assert!(matches!(err.root(), AbiError::Range(_)), "{:?}", err);
    assert!(matches!(err, AbiError::Parameter { index: 0, .. }));
}

// ==================== Façade validation ====================

#[test]
fn test_decode_rejects_bad_hex() {
    for bad in ["a9059cbb", "0xa9059cb", "0xnothex!"] {
        assert!(matches!(decode(bad, TRANSFER_ABI), Err(AbiError::InvalidHex(_))));
    }
}

#[test]
fn test_decode_rejects_bad_abi() {
    assert!(matches!(decode(TRANSFER_CALLDATA, "[]"), Err(AbiError::InvalidAbi(_))));
    assert!(matches!(decode(TRANSFER_CALLDATA, "{"), Err(AbiError::InvalidAbi(_))));
}

#[test]
fn test_decode_selector_mismatch() {
    let calldata = format!("0x095ea7b3{}", &TRANSFER_CALLDATA[10..]);
    assert_eq!(
        decode(&calldata, TRANSFER_ABI),
        Err(AbiError::SelectorMismatch("0x095ea7b3".into()))
    );
}

#[test]
fn test_decode_calldata_shorter_than_selector() {
    assert!(matches!(
        decode("0xa905", TRANSFER_ABI),
        Err(AbiError::TruncatedData { needed: 4, available: 2 })
    ));
}

#[test]
fn test_decode_reports_shadowed_entries() {
    let abi = r#"[
        { "type": "function", "name": "transfer",
          "inputs": [{ "name": "to", "type": "address" }, { "name": "amount", "type": "uint256" }] },
        { "type": "function", "name": "transfer",
          "inputs": [{ "name": "dst", "type": "address" }, { "name": "wad", "type": "uint" }] }
    ]"#;
    let call = decode(TRANSFER_CALLDATA, abi).unwrap();
    assert_eq!(call.parameters[0].name, "to");
    assert_eq!(call.warnings.len(), 1);
    assert!(call.warnings[0].contains("0xa9059cbb"));
}

#[test]
fn test_encode_invalid_signature() {
    assert!(matches!(
        encode("transfer address,uint256", &[RECIPIENT, "1"]),
        Err(AbiError::InvalidSignature(_))
    ));
}

#[test]
fn test_encode_bad_address_text() {
    let err = encode("transfer(address,uint256)", &["0x1234", "1"]).unwrap_err();
    assert!(matches!(err.root(), AbiError::InvalidType(_)));
    assert!(err.to_string().starts_with("parameter 0 (address)"));
}

#[test]
fn test_encode_output_is_whole_words() {
    let calldata = encode(
        "register(string,bytes32[],(address,bool))",
        &[
            "iridescia",
            "[0x0000000000000000000000000000000000000000000000000000000000000001]",
            "(0x0000000000000000000000000000000000000000, true)",
        ],
    )
    .unwrap();
    let bytes = (calldata.len() - 2) / 2;
    assert_eq!((bytes - 4) % 32, 0);
    assert_eq!(calldata, calldata.to_lowercase());
}

#[test]
fn test_encode_then_decode_dynamic_call() {
    let request = EncodeRequest::new(
        "submit(string,uint256[],int16)",
        &["hello world", "[1, 2, 3]", "-300"],
    );
    let encoded = request.execute().unwrap();

    let abi = r#"[{ "type": "function", "name": "submit", "inputs": [
        { "name": "note", "type": "string" },
        { "name": "ids", "type": "uint256[]" },
        { "name": "delta", "type": "int16" }
    ] }]"#;
    let call = decode(&encoded.calldata, abi).unwrap();
    assert_eq!(call.selector_hex, encoded.selector_hex);

    let rendered: Vec<String> = call.parameters.iter().map(|p| p.value.to_string()).collect();
    assert_eq!(rendered, vec!["hello world", "[1, 2, 3]", "-300"]);
}

#[test]
fn test_decode_tuple_components_from_json() {
    let abi = r#"{ "abi": [{
        "type": "function", "name": "fill", "stateMutability": "payable",
        "inputs": [{ "name": "order", "type": "tuple", "components": [
            { "name": "maker", "type": "address" },
            { "name": "amounts", "type": "uint128[]" }
        ] }]
    }] }"#;
    let calldata = encode(
        "fill((address,uint128[]))",
        &["(0x0000000000000000000000000000000000000002, [10, 20])"],
    )
    .unwrap();

    let document = AbiDocument::from_json(abi).unwrap();
    assert_eq!(document.functions()[0].state_mutability.as_deref(), Some("payable"));

    let call = decode(&calldata, abi).unwrap();
    assert_eq!(call.signature, "fill((address,uint128[]))");
    assert_eq!(call.parameters[0].type_string, "(address,uint128[])");
    assert_eq!(
        serde_json::to_value(&call.parameters[0].value).unwrap(),
        serde_json::json!(["0x0000000000000000000000000000000000000002", ["10", "20"]])
    );
}

#[test]
fn test_oversized_fixed_array_is_rejected() {
    let err = encode("f(uint256[576460752303423488][0])", &["[]"]).unwrap_err();
    assert!(matches!(err, AbiError::InvalidType(_)), "{:?}", err);

    let abi = r#"[{ "type": "function", "name": "f", "inputs": [
        { "name": "grid", "type": "uint256[576460752303423488][]" }
    ] }]"#;
    let calldata = format!("0x00000000{:064x}{:064x}", 0x20, 1);
    assert!(matches!(decode(&calldata, abi), Err(AbiError::InvalidAbi(_))));
}

#[test]
fn test_decode_rejects_self_referencing_nesting() {
    let abi = r#"[{ "type": "function", "name": "f", "inputs": [
        { "name": "cube", "type": "uint256[][][]" }
    ] }]"#;
    let selector = irid_abi::selector_from_signature("f(uint256[][][])").unwrap().1;

    let n = 100;
    let word = |v: usize| format!("{:064x}", v);
    let mut calldata = format!("0x{}", hex::encode(selector));
    calldata.push_str(&word(0x20));
    for _ in 0..2 {
        calldata.push_str(&word(n));
        calldata.push_str(&word(32 * n).repeat(n));
    }
    calldata.push_str(&word(n));
    calldata.push_str(&word(0).repeat(n));
    assert_eq!((calldata.len() - 2) / 2, 9732);

    let err = decode(&calldata, abi).unwrap_err();
    assert!(matches!(err.root(), AbiError::InvalidType(_)), "{:?}", err);
}
