//! # Inbound Ports

use super::outbound::EntityListener;
use crate::domain::errors::HandlerError;
use shared_types::RecordItem;

/// Turns one record item into rows.
///
/// Rows go to `listener`, which belongs to the caller's unit of work. An
/// error leaves the listener's buffer partially filled; the caller must
/// discard it.
pub trait RecordItemListener: Send + Sync {
    fn on_item(
        &self,
        item: &RecordItem,
        listener: &mut dyn EntityListener,
    ) -> Result<(), HandlerError>;
}

impl<T: RecordItemListener + ?Sized> RecordItemListener for std::sync::Arc<T> {
    fn on_item(
        &self,
        item: &RecordItem,
        listener: &mut dyn EntityListener,
    ) -> Result<(), HandlerError> {
        (**self).on_item(item, listener)
    }
}
