//! # Outbound Ports
//!
//! - `MirrorStore` - history, errata bulk updates, existence checks
//! - `RecordItemListener` - the record item processor backfilled items go through
//! - `EntityListener` + `RecordStreamFileListener` - the sink that commits them
//! - `StreamFileSource` - the missing-transaction `.bin` files

pub use mn_02_stream_reader::StreamFileSource;
pub use mn_03_transaction_handlers::RecordItemListener;
pub use mn_04_entity_listener::MirrorStore;
pub use shared_types::{EntityListener, RecordStreamFileListener};
