//! Stdin snapshot decoding and the figures derived from it.

use std::io::Read;

use crate::types::StdinInput;

/// Tokens reserved for the host's auto-compaction; counted as already used.
pub const AUTOCOMPACT_BUFFER: u64 = 5_000;

/// Reads and decodes the stdin document. Empty or unparsable input is `None`.
pub fn read_input<R: Read>(mut reader: R) -> Option<StdinInput> {
    let mut raw = String::new();
    if let Err(e) = reader.read_to_string(&mut raw) {
        tracing::warn!(error = %e, "Failed to read stdin");
        return None;
    }

    if raw.trim().is_empty() {
        return None;
    }

    match serde_json::from_str(&raw) {
        Ok(input) => Some(input),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to parse stdin");
            None
        }
    }
}

impl StdinInput {
    fn usage_tokens(&self) -> Option<u64> {
        let usage = self.context_window.as_ref()?.current_usage.as_ref()?;
        Some(
            usage.input_tokens.unwrap_or(0)
                + usage.cache_creation_input_tokens.unwrap_or(0)
                + usage.cache_read_input_tokens.unwrap_or(0),
        )
    }

    /// Context usage in percent, including `buffer` reserved tokens.
    ///
    /// Prefers the host-computed `used_percentage` when present.
    pub fn context_percent(&self, buffer: u64) -> u8 {
        let window = match &self.context_window {
            Some(w) => w,
            None => return 0,
        };

        if let Some(used) = window.used_percentage {
            return used.round().clamp(0.0, 100.0) as u8;
        }

        let (Some(tokens), Some(total)) = (self.usage_tokens(), window.context_window_size) else {
            return 0;
        };
        if total == 0 {
            return 0;
        }

        let percent = ((tokens + buffer) as f64 / total as f64 * 100.0).round();
        percent.min(100.0) as u8
    }

    /// Tokens in the current context plus `buffer`; 0 when usage is unknown.
    pub fn current_tokens(&self, buffer: u64) -> u64 {
        self.usage_tokens().map(|t| t + buffer).unwrap_or(0)
    }

    pub fn total_tokens(&self) -> u64 {
        self.context_window
            .as_ref()
            .and_then(|w| w.context_window_size)
            .unwrap_or(0)
    }

    pub fn display_name(&self) -> Option<&str> {
        self.model.as_ref()?.display_name.as_deref()
    }

    pub fn model_id(&self) -> Option<&str> {
        self.model.as_ref()?.id.as_deref()
    }
}
