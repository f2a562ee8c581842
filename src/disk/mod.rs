//! Snapshot and capacity operations on disks backed by dedicated storage.

use crate::apis::v1::{
    self, CreateSnapshotRequest, ExpandDiskRequest, Invoker, Snapshot, SnapshotListResponse,
    UpdateSnapshotRequest,
};
use crate::error::{ApiFuture, call};

/// Snapshot lifecycle and expansion of a single disk.
pub trait DiskApi {
    /// Captures the disk's current contents.
    fn create_snapshot<'a>(
        &'a self,
        disk_id: i64,
        request: &'a CreateSnapshotRequest,
    ) -> ApiFuture<'a, Snapshot>;

    /// Lists the disk's snapshots.
    fn list_snapshots(&self, disk_id: i64) -> ApiFuture<'_, SnapshotListResponse>;

    /// Renames or re-describes a snapshot.
    fn update_snapshot<'a>(
        &'a self,
        disk_id: i64,
        snapshot_id: i64,
        request: &'a UpdateSnapshotRequest,
    ) -> ApiFuture<'a, Snapshot>;

    /// Deletes a snapshot.
    fn delete_snapshot(&self, disk_id: i64, snapshot_id: i64) -> ApiFuture<'_, ()>;

    /// Rolls the disk back to a snapshot.
    fn restore_from_snapshot(&self, disk_id: i64, snapshot_id: i64) -> ApiFuture<'_, ()>;

    /// Grows the disk.
    fn expand<'a>(&'a self, disk_id: i64, request: &'a ExpandDiskRequest) -> ApiFuture<'a, ()>;
}

/// [`DiskApi`] over any [`Invoker`].
#[derive(Clone, Debug)]
pub struct DiskOp<I = v1::Client> {
    client: I,
}

impl<I: Invoker> DiskOp<I> {
    /// Wraps `client`.
    #[must_use]
    pub const fn new(client: I) -> Self {
        Self { client }
    }
}

impl<I: Invoker> DiskApi for DiskOp<I> {
    fn create_snapshot<'a>(
        &'a self,
        disk_id: i64,
        request: &'a CreateSnapshotRequest,
    ) -> ApiFuture<'a, Snapshot> {
        Box::pin(async move {
            let response = call(
                "Disk.CreateSnapshot",
                self.client.disks_create_snapshot(disk_id, request),
            )
            .await?;
            Ok(response.snapshot)
        })
    }

    fn list_snapshots(&self, disk_id: i64) -> ApiFuture<'_, SnapshotListResponse> {
        Box::pin(call(
            "Disk.ListSnapshots",
            self.client.disks_list_snapshots(disk_id),
        ))
    }

    fn update_snapshot<'a>(
        &'a self,
        disk_id: i64,
        snapshot_id: i64,
        request: &'a UpdateSnapshotRequest,
    ) -> ApiFuture<'a, Snapshot> {
        Box::pin(async move {
            let response = call(
                "Disk.UpdateSnapshot",
                self.client
                    .disks_update_snapshot(disk_id, snapshot_id, request),
            )
            .await?;
            Ok(response.snapshot)
        })
    }

    fn delete_snapshot(&self, disk_id: i64, snapshot_id: i64) -> ApiFuture<'_, ()> {
        Box::pin(call(
            "Disk.DeleteSnapshot",
            self.client.disks_delete_snapshot(disk_id, snapshot_id),
        ))
    }

    fn restore_from_snapshot(&self, disk_id: i64, snapshot_id: i64) -> ApiFuture<'_, ()> {
        Box::pin(call(
            "Disk.RestoreFromSnapshot",
            self.client.disks_restore_snapshot(disk_id, snapshot_id),
        ))
    }

    fn expand<'a>(&'a self, disk_id: i64, request: &'a ExpandDiskRequest) -> ApiFuture<'a, ()> {
        Box::pin(call("Disk.Expand", self.client.disks_expand(disk_id, request)))
    }
}

#[cfg(test)]
mod tests;
