use crate::errors::ServiceError;
use crate::models::parse_wei;
use deposit_ledger::WEI_PER_ETHER;

#[test]
fn test_parse_wei_accepts_decimal_strings() {
    assert_eq!(parse_wei("0").unwrap(), 0);
    assert_eq!(parse_wei(" 100000000000000000 ").unwrap(), WEI_PER_ETHER / 10);
    assert_eq!(
        parse_wei("1000000000000000000000").unwrap(),
        1_000 * WEI_PER_ETHER
    );
}

#[test]
fn test_parse_wei_rejects_malformed_input() {
    for input in ["", "1.5", "-1", "1e18", "0x10", "lots"] {
        let err = parse_wei(input).unwrap_err();
        assert!(matches!(err, ServiceError::InvalidAmount(_)));
    }
}

#[test]
fn test_fee_affordability_arithmetic() {
    let balance = 1_000 * WEI_PER_ETHER;
    let fee = 21_000u128 * 1_000_000_000;

    // A full-balance deposit cannot also cover the fee.
    assert!(balance < balance.saturating_add(fee));
    assert!(balance >= (balance - fee).saturating_add(fee));
}
