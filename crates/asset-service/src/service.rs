//! Asset service
//!
//! [`AssetService`] is the single entry point for form submissions, direct
//! table edits, reorders, dropdown management and reads. The record store
//! sits behind one async mutex so stimuli run one at a time. Attention
//! notifications are sent after the mutation has committed and the lock has
//! been released.

use crate::error::ServiceError;
use crate::messaging::{Messenger, NotificationPayload};
use crate::response::{
    AssetList, CreatedAsset, DropdownValues, EditedAsset, NotificationStatus, OperationResult,
    ReorderedAsset,
};
use asset_core::{
    AssetFields, AttentionComment, Column, DropdownField, RowRef, Status, StatusStateMachine,
};
use asset_store::{RecordStore, RenderedRow, StoreError, UpdateOutcome, Workbook};
use std::sync::Arc;
use tokio::sync::Mutex;

/// State guarded by the service lock; held attention notifications live
/// in the store so they are saved with the workbook
#[derive(Debug)]
struct State {
    store: RecordStore,
}

/// An edit that has committed, with the notification still to send
struct Committed {
    edited: EditedAsset,
    delivery: Option<NotificationPayload>,
}

/// Async facade over the record store
pub struct AssetService {
    state: Mutex<State>,
    messenger: Arc<dyn Messenger>,
}

impl std::fmt::Debug for AssetService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AssetService").finish_non_exhaustive()
    }
}

impl AssetService {
    /// Create service over a store
    #[must_use]
    pub fn new(store: RecordStore, messenger: Arc<dyn Messenger>) -> Self {
        Self {
            state: Mutex::new(State { store }),
            messenger,
        }
    }

    /// Persistent state for saving
    pub async fn workbook(&self) -> Workbook {
        self.state.lock().await.store.to_workbook()
    }

    /// Identifiers in `Requires Attention` still waiting for a comment
    pub async fn awaiting_comment(&self) -> Vec<String> {
        let state = self.state.lock().await;
        state.store.awaiting_comment().map(str::to_string).collect()
    }

    /// Add-form submission
    pub async fn submit_new(&self, fields: AssetFields) -> OperationResult<CreatedAsset> {
        let mut state = self.state.lock().await;
        match state.store.create(&fields) {
            Ok(row) => {
                let id = state
                    .store
                    .read(row)
                    .map(|r| r.id.clone())
                    .unwrap_or_default();
                OperationResult::ok(format!("Asset {id} created"), CreatedAsset { row, id })
            }
            Err(e) => reject("submit_new", e.into()),
        }
    }

    /// Edit-form submission. A comment in `fields.comment` is used for the
    /// attention notification when the edit enters `Requires Attention`.
    pub async fn submit_edit(&self, row: RowRef, fields: AssetFields) -> OperationResult<EditedAsset> {
        let committed = {
            let mut state = self.state.lock().await;
            match state.store.update(row, &fields) {
                Ok(outcome) => state.settle(outcome, fields.comment.as_deref()),
                Err(e) => return reject("submit_edit", e.into()),
            }
        };
        self.deliver(committed).await
    }

    /// Direct edit of one table cell
    pub async fn apply_cell_edit(
        &self,
        row: RowRef,
        column: Column,
        value: &str,
    ) -> OperationResult<EditedAsset> {
        let committed = {
            let mut state = self.state.lock().await;
            match state.store.apply_cell_edit(row, column, value) {
                Ok(outcome) => state.settle(outcome, None),
                Err(e) => return reject("apply_cell_edit", e.into()),
            }
        };
        self.deliver(committed).await
    }

    /// Send the attention notification for a record already in
    /// `Requires Attention`, either after a status change without comment
    /// or to retry a failed delivery
    pub async fn submit_attention_comment(
        &self,
        row: RowRef,
        comment: &str,
    ) -> OperationResult<EditedAsset> {
        let committed = {
            let mut state = self.state.lock().await;
            match state.attention_request(row, comment) {
                Ok(committed) => committed,
                Err(e) => return reject("submit_attention_comment", e),
            }
        };
        self.deliver(committed).await
    }

    /// Clone a record into a new linked order
    pub async fn reorder(&self, row: RowRef, quantity: u32) -> OperationResult<ReorderedAsset> {
        let mut state = self.state.lock().await;
        match state.store.reorder(row, quantity) {
            Ok(outcome) => OperationResult::ok(
                format!("Asset {} reordered as {}", outcome.source_id, outcome.id),
                ReorderedAsset {
                    row: outcome.row,
                    id: outcome.id,
                    source_id: outcome.source_id,
                },
            ),
            Err(e) => reject("reorder", e.into()),
        }
    }

    /// One record with its treatment
    pub async fn fetch(&self, row: RowRef) -> OperationResult<RenderedRow> {
        let state = self.state.lock().await;
        match state.store.render(row) {
            Some(rendered) => OperationResult::ok(format!("Asset {}", rendered.record.id), rendered),
            None => reject("fetch", StoreError::RowNotFound(row).into()),
        }
    }

    /// Every record in display order
    pub async fn list(&self) -> OperationResult<AssetList> {
        let state = self.state.lock().await;
        let rows = state.store.rendered_rows();
        OperationResult::ok(format!("{} assets", rows.len()), AssetList { rows })
    }

    /// Values of a dropdown list
    pub async fn list_dropdown_values(&self, field: DropdownField) -> OperationResult<DropdownValues> {
        let state = self.state.lock().await;
        let values = state.store.list_dropdown(field);
        OperationResult::ok(format!("{} {field} values", values.len()), DropdownValues { field, values })
    }

    /// Add a dropdown value
    pub async fn add_dropdown_value(
        &self,
        field: DropdownField,
        value: &str,
    ) -> OperationResult<DropdownValues> {
        let mut state = self.state.lock().await;
        match state.store.add_dropdown(field, value) {
            Ok(()) => state.dropdown_result(field, format!("Added {} to {field}", value.trim())),
            Err(e) => reject("add_dropdown_value", e.into()),
        }
    }

    /// Rename a dropdown value
    pub async fn update_dropdown_value(
        &self,
        field: DropdownField,
        old: &str,
        new: &str,
    ) -> OperationResult<DropdownValues> {
        let mut state = self.state.lock().await;
        match state.store.update_dropdown(field, old, new) {
            Ok(()) => state.dropdown_result(
                field,
                format!("Renamed {} to {} in {field}", old.trim(), new.trim()),
            ),
            Err(e) => reject("update_dropdown_value", e.into()),
        }
    }

    /// Delete a dropdown value
    pub async fn delete_dropdown_value(
        &self,
        field: DropdownField,
        value: &str,
    ) -> OperationResult<DropdownValues> {
        let mut state = self.state.lock().await;
        match state.store.delete_dropdown(field, value) {
            Ok(()) => state.dropdown_result(field, format!("Deleted {} from {field}", value.trim())),
            Err(e) => reject("delete_dropdown_value", e.into()),
        }
    }

    /// Send the pending notification of a committed edit
    async fn deliver(&self, committed: Committed) -> OperationResult<EditedAsset> {
        let Committed { mut edited, delivery } = committed;
        let Some(mut payload) = delivery else {
            let message = match edited.notification {
                NotificationStatus::AwaitingComment => format!(
                    "Asset {} updated; add a comment to notify about the attention status",
                    edited.id
                ),
                _ => format!("Asset {} updated", edited.id),
            };
            return OperationResult::ok(message, edited);
        };

        payload.recipients = self.messenger.recipients();
        match self.messenger.send_notification(&payload).await {
            Ok(receipt) => {
                tracing::info!(id = %edited.id, message_id = %receipt.message_id, "attention notification sent");
                edited.notification = NotificationStatus::Sent {
                    message_id: receipt.message_id,
                };
                OperationResult::ok(
                    format!("Asset {} updated; attention notification sent", edited.id),
                    edited,
                )
            }
            Err(e) => {
                tracing::error!(id = %edited.id, error = %e, "attention notification failed");
                let error = ServiceError::from(e);
                let message = format!("Asset {} updated but {error}", edited.id);
                edited.notification = NotificationStatus::Failed {
                    reason: error.to_string(),
                };
                OperationResult::partial(&error, message, edited)
            }
        }
    }
}

impl State {
    /// Decide the notification for a committed edit. A record entering
    /// `Requires Attention`, or still waiting for its comment, is notified
    /// once a non-empty comment arrives.
    fn settle(&mut self, outcome: UpdateOutcome, comment: Option<&str>) -> Committed {
        let waiting = outcome.status == Status::RequiresAttention
            && self.store.is_awaiting_comment(&outcome.id);
        let mut delivery = None;
        let notification = if outcome.requires_attention() || waiting {
            match comment.map(AttentionComment::new) {
                Some(Ok(comment)) => {
                    self.store.release_attention(&outcome.id);
                    delivery = self.payload(outcome.row, &comment);
                    NotificationStatus::NotRequired
                }
                _ => {
                    tracing::warn!(id = %outcome.id, "attention status without comment, notification held");
                    self.store.hold_attention(&outcome.id);
                    NotificationStatus::AwaitingComment
                }
            }
        } else {
            self.store.release_attention(&outcome.id);
            NotificationStatus::NotRequired
        };
        Committed {
            edited: EditedAsset {
                row: outcome.row,
                treatment: outcome.transition.treatment,
                id: outcome.id,
                previous_status: outcome.previous_status,
                status: outcome.status,
                notification,
            },
            delivery,
        }
    }

    fn attention_request(&mut self, row: RowRef, comment: &str) -> Result<Committed, ServiceError> {
        let comment = AttentionComment::new(comment)?;
        let record = self.store.get(row)?;
        if record.status != Status::RequiresAttention {
            return Err(ServiceError::NotAwaitingAttention {
                id: record.id.clone(),
            });
        }
        let edited = EditedAsset {
            row,
            id: record.id.clone(),
            previous_status: record.status.clone(),
            status: record.status.clone(),
            treatment: StatusStateMachine::treatment(&record.status),
            notification: NotificationStatus::NotRequired,
        };
        let delivery = self.payload(row, &comment);
        self.store.release_attention(&edited.id);
        Ok(Committed { edited, delivery })
    }

    /// Payload for the record at `row`; recipients are filled in on send
    fn payload(&self, row: RowRef, comment: &AttentionComment) -> Option<NotificationPayload> {
        let record = self.store.read(row)?;
        Some(NotificationPayload {
            asset_id: record.id.clone(),
            asset_name: record.asset_name.clone(),
            location: self.store.config().row_link(row),
            comment: comment.as_str().to_string(),
            recipients: Vec::new(),
        })
    }

    fn dropdown_result(&self, field: DropdownField, message: String) -> OperationResult<DropdownValues> {
        OperationResult::ok(
            message,
            DropdownValues {
                field,
                values: self.store.list_dropdown(field),
            },
        )
    }
}

fn reject<T>(operation: &'static str, error: ServiceError) -> OperationResult<T> {
    tracing::warn!(operation, kind = error.kind().as_str(), error = %error, "operation rejected");
    OperationResult::failure(&error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::DeliveryError;
    use crate::messaging::{DeliveryReceipt, MockMessenger};
    use asset_core::{ErrorKind, Highlight, Treatment};
    use asset_store::EngineConfig;

    fn fields(name: &str, material: &str) -> AssetFields {
        AssetFields {
            asset_name: name.to_string(),
            material: material.to_string(),
            quantity: Some(1),
            ..AssetFields::default()
        }
    }

    fn attention(comment: Option<&str>) -> AssetFields {
        AssetFields {
            status: Some(Status::RequiresAttention),
            comment: comment.map(str::to_string),
            ..fields("Banner", "Vinyl")
        }
    }

    fn messenger_expecting(times: usize) -> MockMessenger {
        let mut messenger = MockMessenger::new();
        messenger
            .expect_recipients()
            .returning(|| vec!["ops@example.com".to_string()]);
        messenger
            .expect_send_notification()
            .times(times)
            .returning(|payload| {
                Ok(DeliveryReceipt {
                    message_id: format!("msg-{}", payload.asset_id),
                    delivered_to: payload.recipients.clone(),
                })
            });
        messenger
    }

    async fn service_with(messenger: MockMessenger) -> (AssetService, RowRef) {
        let store = RecordStore::new(EngineConfig::new().with_sheet_url("https://sheet.example"));
        let service = AssetService::new(store, Arc::new(messenger));
        let created = service.submit_new(fields("Banner", "Vinyl")).await;
        let row = created.payload.unwrap().row;
        (service, row)
    }

    #[tokio::test]
    async fn entering_attention_with_comment_notifies() {
        let (service, row) = service_with(messenger_expecting(1)).await;
        let result = service.submit_edit(row, attention(Some("check seams"))).await;
        assert!(result.success);
        let edited = result.payload.unwrap();
        assert_eq!(edited.status, Status::RequiresAttention);
        assert_eq!(edited.treatment, Treatment::Highlight(Highlight::B));
        assert_eq!(
            edited.notification,
            NotificationStatus::Sent {
                message_id: "msg-A01".into()
            }
        );
    }

    #[tokio::test]
    async fn staying_in_attention_does_not_renotify() {
        let (service, row) = service_with(messenger_expecting(1)).await;
        let first = service.submit_edit(row, attention(Some("check seams"))).await;
        let row = first.payload.unwrap().row;
        let again = service.submit_edit(row, attention(Some("still wrong"))).await;
        assert!(again.success);
        assert_eq!(again.payload.unwrap().notification, NotificationStatus::NotRequired);
    }

    #[tokio::test]
    async fn missing_comment_holds_notification() {
        let (service, row) = service_with(messenger_expecting(1)).await;
        let result = service.submit_edit(row, attention(Some("  "))).await;
        assert!(result.success);
        let edited = result.payload.unwrap();
        assert_eq!(edited.notification, NotificationStatus::AwaitingComment);
        assert_eq!(service.awaiting_comment().await, vec!["A01"]);

        let result = service.submit_attention_comment(edited.row, "needs reprint").await;
        assert!(result.success);
        assert!(service.awaiting_comment().await.is_empty());
    }

    #[tokio::test]
    async fn failed_delivery_keeps_status() {
        let mut messenger = MockMessenger::new();
        messenger.expect_recipients().returning(Vec::new);
        messenger
            .expect_send_notification()
            .times(1)
            .returning(|_| Err(DeliveryError::Unavailable("smtp down".into())));
        let (service, row) = service_with(messenger).await;

        let result = service.submit_edit(row, attention(Some("check seams"))).await;
        assert!(!result.success);
        assert_eq!(result.error_kind, Some(ErrorKind::ExternalDelivery));
        let edited = result.payload.unwrap();
        assert!(matches!(edited.notification, NotificationStatus::Failed { .. }));

        let fetched = service.fetch(edited.row).await.payload.unwrap();
        assert_eq!(fetched.record.status, Status::RequiresAttention);
    }

    #[tokio::test]
    async fn comment_requires_attention_status() {
        let (service, row) = service_with(messenger_expecting(0)).await;
        let result = service.submit_attention_comment(row, "hello").await;
        assert!(!result.success);
        assert_eq!(result.error_kind, Some(ErrorKind::Validation));

        let result = service.submit_attention_comment(row, "").await;
        assert_eq!(result.error_kind, Some(ErrorKind::Validation));
    }

    #[tokio::test]
    async fn rejected_operations_report_kind() {
        let (service, _) = service_with(messenger_expecting(0)).await;
        let result = service.submit_edit(RowRef::new(50), fields("x", "Vinyl")).await;
        assert_eq!(result.error_kind, Some(ErrorKind::NotFound));
        assert!(result.payload.is_none());

        let result = service.submit_new(fields("", "Vinyl")).await;
        assert_eq!(result.error_kind, Some(ErrorKind::Validation));

        let result = service.add_dropdown_value(DropdownField::Material, "Vinyl").await;
        assert_eq!(result.error_kind, Some(ErrorKind::Duplicate));
    }
}
