// self
use crate::obs::ProvisionOutcome;

/// Records a provisioning outcome via the global metrics recorder (when enabled).
pub fn record_provision_outcome(outcome: ProvisionOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!("asap_token_provision_total", "outcome" => outcome.as_str()).increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = outcome;
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_provision_outcome_noop_without_metrics() {
		record_provision_outcome(ProvisionOutcome::Failure);
	}
}
