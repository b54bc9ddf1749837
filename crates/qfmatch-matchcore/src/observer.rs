//! Optional observability hook.
//!
//! The engine reports its intermediate stages to a [`MatchObserver`]. None of
//! this is part of the return value: the calculation map is the same whether
//! an observer is attached or not.

use qfmatch_types::{Amount, Calculation, RecipientId, RecipientsCalculations, SaturationMode};

use crate::Aggregation;

/// Snapshot of one cap-redistribution pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CapPass {
    /// 1-based pass number.
    pub pass: usize,
    /// Overflow clamped off in this pass.
    pub total_overflow: Amount,
    /// `Σ matched` over recipients still under the cap.
    pub total_uncapped_matched: Amount,
    /// Recipients still under the cap after this pass's clamp.
    pub uncapped_recipients: usize,
    /// Recipients clamped for the first time in this pass.
    pub newly_capped: usize,
}

/// Receives engine events. Every method defaults to a no-op.
pub trait MatchObserver {
    fn on_aggregated(&mut self, _aggregation: &Aggregation) {}

    fn on_raw_match(
        &mut self,
        _recipient: &RecipientId,
        _calculation: &Calculation,
        _raw_match: &Amount,
    ) {
    }

    fn on_saturation(
        &mut self,
        _mode: SaturationMode,
        _total_raw_match: &Amount,
        _match_amount: &Amount,
    ) {
    }

    fn on_cap_pass(&mut self, _pass: &CapPass) {}

    fn on_complete(&mut self, _calculations: &RecipientsCalculations) {}
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopObserver;

impl MatchObserver for NoopObserver {}

/// Forwards every event to `tracing` at DEBUG level.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl MatchObserver for TracingObserver {
    fn on_aggregated(&mut self, aggregation: &Aggregation) {
        tracing::debug!(
            recipients = aggregation.recipient_count(),
            total_received = %aggregation.total_received,
            "Contributions aggregated"
        );
    }

    fn on_raw_match(&mut self, recipient: &RecipientId, calculation: &Calculation, raw_match: &Amount) {
        tracing::debug!(
            %recipient,
            contributors = calculation.contribution_count,
            sum_of_sqrt = %calculation.sum_of_sqrt,
            total_received = %calculation.total_received,
            raw_match = %raw_match,
            "Raw QF weight"
        );
    }

    fn on_saturation(&mut self, mode: SaturationMode, total_raw_match: &Amount, match_amount: &Amount) {
        tracing::debug!(
            %mode,
            total_raw_match = %total_raw_match,
            match_amount = %match_amount,
            "Saturation policy applied"
        );
    }

    fn on_cap_pass(&mut self, pass: &CapPass) {
        tracing::debug!(
            pass = pass.pass,
            total_overflow = %pass.total_overflow,
            total_uncapped_matched = %pass.total_uncapped_matched,
            uncapped = pass.uncapped_recipients,
            newly_capped = pass.newly_capped,
            "Cap redistribution pass"
        );
    }

    fn on_complete(&mut self, calculations: &RecipientsCalculations) {
        tracing::debug!(recipients = calculations.len(), "Calculations complete");
    }
}
