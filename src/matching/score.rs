//! Match confidence scoring
//!
//! Pure and table-driven: one movement, one obligation, explicit weights in,
//! a confidence plus auto-link eligibility out. The amount and date terms
//! work in integer cents and whole days; nothing here touches storage.

use crate::models::{Movement, Obligation};

use super::text;

/// Scoring weights and thresholds.
///
/// Kept explicit rather than inlined so tests and future tuning see every
/// knob in one place. `DEFAULT` is the production table.
#[derive(Debug, Clone, Copy)]
pub struct MatchWeights {
    /// Amount matches to the cent
    pub amount_exact: f64,
    /// Amount within 50 cents
    pub amount_close: f64,
    /// Amount within 2.00
    pub amount_near: f64,
    /// Amount within 5% of expected
    pub amount_relative: f64,

    /// Same value date
    pub date_exact: f64,
    /// Inside the settlement window (10 days early to 45 days late)
    pub date_window: f64,
    /// Within a week either way
    pub date_week: f64,
    /// Within a month either way
    pub date_month: f64,

    /// Text similarity >= 0.8
    pub text_strong: f64,
    /// Text similarity >= 0.6
    pub text_good: f64,
    /// Text similarity >= 0.3
    pub text_weak: f64,

    /// Added when every term cleared its auto bar and the total is already high
    pub high_confidence_bonus: f64,

    /// Minimum confidence for auto-reconciliation
    pub auto_threshold: f64,
}

impl MatchWeights {
    pub const DEFAULT: MatchWeights = MatchWeights {
        amount_exact: 0.50,
        amount_close: 0.45,
        amount_near: 0.30,
        amount_relative: 0.20,
        date_exact: 0.30,
        date_window: 0.25,
        date_week: 0.20,
        date_month: 0.10,
        text_strong: 0.20,
        text_good: 0.15,
        text_weak: 0.05,
        high_confidence_bonus: 0.10,
        auto_threshold: 0.85,
    };
}

impl Default for MatchWeights {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Result of scoring one movement against one obligation
#[derive(Debug, Clone)]
pub struct MatchScore {
    /// Confidence in [0, 1]
    pub confidence: f64,
    /// Whether every term cleared its bar for unattended linking
    pub auto_eligible: bool,
    /// Human-readable audit text naming the terms that fired
    pub reason: String,
}

/// Score a movement against an obligation.
///
/// The caller is responsible for sign routing; this function compares
/// magnitudes only.
pub fn score(movement: &Movement, obligation: &Obligation, weights: &MatchWeights) -> MatchScore {
    let mut confidence = 0.0;
    let mut auto_eligible = true;
    let mut reasons: Vec<String> = Vec::new();

    // Amount term
    let actual = movement.amount.abs().cents();
    let expected = obligation.expected_amount.cents();
    let delta = actual - expected;

    if delta == 0 {
        confidence += weights.amount_exact;
        reasons.push(format!("exact amount (+{:.2})", weights.amount_exact));
    } else if delta.abs() <= 50 {
        confidence += weights.amount_close;
        reasons.push(format!("amount within 0.50 (+{:.2})", weights.amount_close));
    } else if delta.abs() <= 200 {
        confidence += weights.amount_near;
        auto_eligible = false;
        reasons.push(format!("amount within 2.00 (+{:.2})", weights.amount_near));
    } else if expected > 0 && (delta.abs() as f64 / expected as f64) < 0.05 {
        confidence += weights.amount_relative;
        auto_eligible = false;
        reasons.push(format!("amount within 5% (+{:.2})", weights.amount_relative));
    } else {
        auto_eligible = false;
        reasons.push("amount mismatch".to_string());
    }

    // Date term
    let delta_days = (movement.date - obligation.expected_date).num_days();

    if delta_days == 0 {
        confidence += weights.date_exact;
        reasons.push(format!("same date (+{:.2})", weights.date_exact));
    } else if (-10..=45).contains(&delta_days) {
        confidence += weights.date_window;
        reasons.push(format!(
            "inside settlement window (+{:.2})",
            weights.date_window
        ));
    } else if delta_days.abs() <= 7 {
        confidence += weights.date_week;
        auto_eligible = false;
        reasons.push(format!("date within a week (+{:.2})", weights.date_week));
    } else if delta_days.abs() <= 30 {
        confidence += weights.date_month;
        auto_eligible = false;
        reasons.push(format!("date within a month (+{:.2})", weights.date_month));
    } else {
        auto_eligible = false;
        reasons.push(format!("date off by {} days", delta_days));
    }

    // Text term
    let similarity = text::similarity(
        movement.counterparty_or_description(),
        &obligation.counterparty_text,
    );

    if similarity >= 0.8 {
        confidence += weights.text_strong;
        reasons.push(format!("counterparty match (+{:.2})", weights.text_strong));
    } else if similarity >= 0.6 {
        confidence += weights.text_good;
        auto_eligible = false;
        reasons.push(format!(
            "counterparty similar (+{:.2})",
            weights.text_good
        ));
    } else if similarity >= 0.3 {
        confidence += weights.text_weak;
        auto_eligible = false;
        reasons.push(format!(
            "counterparty weak overlap (+{:.2})",
            weights.text_weak
        ));
    } else {
        auto_eligible = false;
        reasons.push("counterparty unrelated".to_string());
    }

    // Bonus only when nothing disqualified the pair and the base score is
    // already strong
    if auto_eligible && confidence >= 0.8 {
        confidence += weights.high_confidence_bonus;
        reasons.push(format!(
            "high-confidence bonus (+{:.2})",
            weights.high_confidence_bonus
        ));
    }

    MatchScore {
        confidence: confidence.clamp(0.0, 1.0),
        auto_eligible,
        reason: reasons.join(", "),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AccountId, BatchId, Money, ObligationKind};
    use chrono::NaiveDate;

    fn movement(cents: i64, date: (i32, u32, u32), text: &str) -> Movement {
        Movement::new(
            AccountId::new(),
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
            Money::from_cents(cents),
            text,
            BatchId::new(),
            0,
        )
    }

    fn obligation(cents: i64, date: (i32, u32, u32), text: &str) -> Obligation {
        Obligation::new(
            ObligationKind::Expense,
            text,
            Money::from_cents(cents),
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        )
    }

    #[test]
    fn test_perfect_match_hits_ceiling() {
        let m = movement(-120000, (2024, 1, 15), "Rent payment John Doe");
        let o = obligation(120000, (2024, 1, 15), "rent payment john doe");

        let s = score(&m, &o, &MatchWeights::DEFAULT);
        // 0.50 + 0.30 + 0.20 + 0.10 bonus, clamped
        assert!((s.confidence - 1.0).abs() < 1e-9);
        assert!(s.auto_eligible);
        assert!(s.reason.contains("exact amount"));
        assert!(s.reason.contains("high-confidence bonus"));
    }

    #[test]
    fn test_rent_example_clears_auto_threshold() {
        // Exact amount, exact date, containment-strength text
        let m = movement(-120000, (2024, 1, 15), "TRANSFER JOHN DOE RENT JANUARY");
        let o = obligation(120000, (2024, 1, 15), "john doe rent");

        let s = score(&m, &o, &MatchWeights::DEFAULT);
        assert!(s.confidence > 0.8, "got {}", s.confidence);
        assert!(s.auto_eligible);
        assert!(s.confidence >= MatchWeights::DEFAULT.auto_threshold);
    }

    #[test]
    fn test_amount_term_monotonic_in_delta() {
        let o = obligation(100000, (2024, 1, 15), "x");
        let deltas = [0, 30, 150, 4000, 50000];

        let scores: Vec<f64> = deltas
            .iter()
            .map(|d| {
                let m = movement(-(100000 + d), (2024, 1, 15), "x");
                score(&m, &o, &MatchWeights::DEFAULT).confidence
            })
            .collect();

        for pair in scores.windows(2) {
            assert!(pair[0] >= pair[1], "scores not monotonic: {:?}", scores);
        }
    }

    #[test]
    fn test_close_amount_keeps_auto() {
        let m = movement(-100030, (2024, 1, 15), "john doe rent payment");
        let o = obligation(100000, (2024, 1, 15), "john doe rent payment");

        let s = score(&m, &o, &MatchWeights::DEFAULT);
        assert!(s.auto_eligible);
        // 0.45 + 0.30 + 0.20 >= 0.8 triggers bonus
        assert!((s.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_near_amount_disqualifies_auto() {
        let m = movement(-100150, (2024, 1, 15), "john doe rent payment");
        let o = obligation(100000, (2024, 1, 15), "john doe rent payment");

        let s = score(&m, &o, &MatchWeights::DEFAULT);
        assert!(!s.auto_eligible);
        // 0.30 + 0.30 + 0.20, no bonus
        assert!((s.confidence - 0.80).abs() < 1e-9);
    }

    #[test]
    fn test_relative_amount_band() {
        // Delta of 30.00 on 1000.00 expected: 3%, inside the 5% band
        let m = movement(-103000, (2024, 1, 15), "john doe rent payment");
        let o = obligation(100000, (2024, 1, 15), "john doe rent payment");

        let s = score(&m, &o, &MatchWeights::DEFAULT);
        assert!(!s.auto_eligible);
        assert!((s.confidence - 0.70).abs() < 1e-9);
    }

    #[test]
    fn test_settlement_window_keeps_auto() {
        // Paid 20 days late
        let m = movement(-120000, (2024, 2, 4), "john doe rent payment");
        let o = obligation(120000, (2024, 1, 15), "john doe rent payment");

        let s = score(&m, &o, &MatchWeights::DEFAULT);
        assert!(s.auto_eligible);
        // 0.50 + 0.25 + 0.20 + 0.10 bonus
        assert!((s.confidence - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_early_payment_outside_window() {
        // Paid 20 days early: outside [-10, 45], within a month
        let m = movement(-120000, (2023, 12, 26), "john doe rent payment");
        let o = obligation(120000, (2024, 1, 15), "john doe rent payment");

        let s = score(&m, &o, &MatchWeights::DEFAULT);
        assert!(!s.auto_eligible);
        // 0.50 + 0.10 + 0.20
        assert!((s.confidence - 0.80).abs() < 1e-9);
    }

    #[test]
    fn test_unrelated_pair_scores_low() {
        let m = movement(-9900, (2024, 6, 1), "Groceries supermarket");
        let o = obligation(120000, (2024, 1, 15), "john doe rent");

        let s = score(&m, &o, &MatchWeights::DEFAULT);
        assert!(!s.auto_eligible);
        assert!(s.confidence < 0.1, "got {}", s.confidence);
    }

    #[test]
    fn test_reason_names_fired_terms() {
        let m = movement(-120000, (2024, 1, 15), "john doe rent payment");
        let o = obligation(120000, (2024, 1, 20), "john doe rent payment");

        let s = score(&m, &o, &MatchWeights::DEFAULT);
        assert!(s.reason.contains("exact amount"));
        assert!(s.reason.contains("settlement window"));
        assert!(s.reason.contains("counterparty match"));
    }
}
