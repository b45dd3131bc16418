use tracing::{debug, error, info};

use crate::{Intent, MuxError, PinBank};

/// Execute the pin writes of `intent` in order.
///
/// The first failing write aborts the intent; later steps are not attempted and earlier ones are
/// not rolled back.
pub fn apply<B: PinBank + ?Sized>(bank: &mut B, intent: Intent) -> Result<(), MuxError> {
    let steps = intent.steps();
    let total = steps.len();
    info!(%intent, "applying routing");

    for (i, step) in steps.iter().enumerate() {
        debug!(
            %intent,
            signal = %step.signal,
            level = %step.level,
            "step {}/{}",
            i + 1,
            total
        );
        bank.drive(step.signal, step.level).map_err(|source| {
            error!(%intent, error = %source, "step {}/{} failed", i + 1, total);
            MuxError {
                intent,
                step: i + 1,
                total,
                source,
            }
        })?;
    }
    Ok(())
}
