//! Signal tracing
//!
//! A [`SignalTracer`] keeps a bounded history of value changes for the
//! entity ids a user chose to watch. Each traced id owns a ring buffer; once
//! full, the oldest event is dropped.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::config::TraceConfig;

/// One recorded signal transition
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SignalEvent {
    /// Value before the change (0 for the first event of a trace)
    pub old_value: i32,
    /// Value after the change
    pub new_value: i32,
    /// Bit width reported with the change
    pub bit_width: u32,
    /// Nanoseconds since the session started
    pub timestamp_ns: u64,
}

impl SignalEvent {
    /// Whether the value actually changed
    pub fn has_changed(&self) -> bool {
        self.old_value != self.new_value
    }
}

/// Per-id bounded signal histories
#[derive(Debug)]
pub struct SignalTracer {
    buffers: HashMap<String, VecDeque<SignalEvent>>,
    traced: HashSet<String>,
    max_events_per_signal: usize,
    enabled: bool,
}

impl Default for SignalTracer {
    fn default() -> Self {
        Self::new(TraceConfig::default())
    }
}

impl SignalTracer {
    /// Create a tracer with nothing traced
    pub fn new(config: TraceConfig) -> Self {
        Self {
            buffers: HashMap::new(),
            traced: HashSet::new(),
            max_events_per_signal: config.max_events_per_signal.max(1),
            enabled: config.enabled,
        }
    }

    /// Start tracing `id` with an empty buffer (an existing trace is reset)
    pub fn start_trace(&mut self, id: &str) {
        self.traced.insert(id.to_string());
        self.buffers.insert(id.to_string(), VecDeque::new());
        log::debug!("Tracing signal '{id}'");
    }

    /// Stop recording `id`; its buffer stays readable
    pub fn stop_trace(&mut self, id: &str) {
        self.traced.remove(id);
    }

    /// Record a value change for `id` if tracing is enabled and `id` is traced
    pub fn record(&mut self, id: &str, value: i32, bit_width: u32, timestamp_ns: u64) -> bool {
        if !self.enabled || !self.traced.contains(id) {
            return false;
        }

        let events = self.buffers.entry(id.to_string()).or_default();
        let old_value = events.back().map_or(0, |e| e.new_value);
        events.push_back(SignalEvent {
            old_value,
            new_value: value,
            bit_width,
            timestamp_ns,
        });

        while events.len() > self.max_events_per_signal {
            events.pop_front();
        }
        true
    }

    /// Recorded events for `id`, oldest first
    pub fn trace(&self, id: &str) -> Vec<SignalEvent> {
        self.buffers
            .get(id)
            .map(|events| events.iter().copied().collect())
            .unwrap_or_default()
    }

    /// Ids currently being traced, sorted
    pub fn traced_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.traced.iter().cloned().collect();
        ids.sort();
        ids
    }

    /// Whether `id` is currently traced
    pub fn is_traced(&self, id: &str) -> bool {
        self.traced.contains(id)
    }

    /// Drop the buffer of `id` without stopping its trace
    pub fn clear_trace(&mut self, id: &str) {
        self.buffers.remove(id);
    }

    /// Drop every buffer and stop every trace
    pub fn clear_all(&mut self) {
        self.buffers.clear();
        self.traced.clear();
    }

    /// Globally enable or disable recording
    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    /// Whether recording is globally enabled
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }
}
