mod escalation_sink;
mod inference;
mod ledger_store;
mod reference_provider;

pub use escalation_sink::IEscalationSink;
pub use inference::IInferenceBackend;
pub use ledger_store::ILedgerStore;
pub use reference_provider::IReferenceFactProvider;
