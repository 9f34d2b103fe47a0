use covenant_core::models::RiskLevel;

#[test]
fn bands_match_spec_cutoffs() {
    for score in 0..=3u8 {
        assert_eq!(RiskLevel::from_score(score), RiskLevel::Low, "score {score}");
    }
    for score in 4..=6u8 {
        assert_eq!(RiskLevel::from_score(score), RiskLevel::Medium, "score {score}");
    }
    for score in 7..=10u8 {
        assert_eq!(RiskLevel::from_score(score), RiskLevel::High, "score {score}");
    }
}

#[test]
fn report_band_consistency_is_enforced() {
    use covenant_core::models::RiskReport;
    use std::collections::BTreeMap;

    let consistent = RiskReport {
        risk_score: 8,
        risk_level: RiskLevel::High,
        concerning_clauses: vec![],
        key_terms: BTreeMap::new(),
    };
    assert!(consistent.is_band_consistent());

    let inconsistent = RiskReport { risk_score: 8, risk_level: RiskLevel::Low, ..consistent };
    assert!(!inconsistent.is_band_consistent());
}
