//! Client handle: the operation surface scripts call
//!
//! Every operation resolves its database and collection from the owned driver
//! client on each call. Database and collection handles are cheap views, so
//! nothing is cached and the handle never changes after construction.

use bson::Document as BsonDocument;
use futures::TryStreamExt;
use loadx_common::{BridgeError, Result};
use mongodb::{
    options::{DeleteOptions, FindOneOptions, FindOptions, Hint},
    Client, Collection,
};
use std::future::Future;

use crate::coercion::{find_limit, id_ascending, set_patch};
use crate::config::ClientConfig;
use crate::connection::deadline_exceeded;
use crate::policy::{ErrorPolicy, Operation};

/// Handle owning one driver client (and so one connection pool).
///
/// Cloning shares the pool. The handle is `Send + Sync` and carries no
/// per-operation state, so one handle can serve many virtual users.
#[derive(Clone, Debug)]
pub struct ClientHandle {
    client: Client,
    config: ClientConfig,
}

impl ClientHandle {
    pub(crate) fn new(client: Client, config: ClientConfig) -> Self {
        Self { client, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn error_policy(&self) -> ErrorPolicy {
        self.config.error_policy
    }

    fn collection(&self, database: &str, collection: &str) -> Collection<BsonDocument> {
        self.client.database(database).collection(collection)
    }

    /// Run `fut` under the configured per-operation deadline
    async fn bounded<T, F>(&self, op: Operation, fut: F) -> Result<T>
    where
        F: Future<Output = Result<T>>,
    {
        match self.config.operation_timeout() {
            Some(limit) => tokio::time::timeout(limit, fut)
                .await
                .map_err(|_| deadline_exceeded(op.name(), limit))?,
            None => fut.await,
        }
    }

    /// Insert one document. The generated `_id` is discarded.
    pub async fn insert(&self, database: &str, collection: &str, doc: BsonDocument) -> Result<()> {
        let col = self.collection(database, collection);
        self.bounded(Operation::Insert, async move {
            col.insert_one(doc).await?;
            Ok(())
        })
        .await
    }

    /// Insert a batch in one driver call; ordering follows the driver default
    pub async fn insert_many(
        &self,
        database: &str,
        collection: &str,
        docs: Vec<BsonDocument>,
    ) -> Result<()> {
        let col = self.collection(database, collection);
        self.bounded(Operation::InsertMany, async move {
            col.insert_many(docs).await?;
            Ok(())
        })
        .await
    }

    /// Query and drain the whole cursor. `limit <= 0` means no limit.
    ///
    /// Failures while draining come back as [`BridgeError::CursorDrain`].
    pub async fn find(
        &self,
        database: &str,
        collection: &str,
        filter: BsonDocument,
        limit: i64,
    ) -> Result<Vec<BsonDocument>> {
        let col = self.collection(database, collection);
        let mut find_options = FindOptions::default();
        find_options.limit = find_limit(limit);

        self.bounded(Operation::Find, drain(col, filter, find_options))
            .await
    }

    /// First match by ascending `_id`, or `None` when nothing matches
    pub async fn find_one(
        &self,
        database: &str,
        collection: &str,
        filter: BsonDocument,
    ) -> Result<Option<BsonDocument>> {
        let col = self.collection(database, collection);
        let mut find_options = FindOneOptions::default();
        find_options.sort = Some(id_ascending());

        let query = filter.clone();
        let found = self
            .bounded(Operation::FindOne, async move {
                Ok(col.find_one(query).with_options(find_options).await?)
            })
            .await?;

        if found.is_none() {
            tracing::info!("No document was found for filter {}", filter);
        }
        Ok(found)
    }

    /// Set the patch fields on at most one matching document
    pub async fn update_one(
        &self,
        database: &str,
        collection: &str,
        filter: BsonDocument,
        patch: BsonDocument,
    ) -> Result<()> {
        let col = self.collection(database, collection);
        self.bounded(Operation::UpdateOne, async move {
            col.update_one(filter, set_patch(patch)).await?;
            Ok(())
        })
        .await
    }

    /// Every document in the collection, unlimited
    pub async fn find_all(&self, database: &str, collection: &str) -> Result<Vec<BsonDocument>> {
        let col = self.collection(database, collection);
        self.bounded(
            Operation::FindAll,
            drain(col, BsonDocument::new(), FindOptions::default()),
        )
        .await
    }

    pub async fn delete_one(
        &self,
        database: &str,
        collection: &str,
        filter: BsonDocument,
    ) -> Result<()> {
        let col = self.collection(database, collection);
        self.bounded(Operation::DeleteOne, async move {
            col.delete_one(filter).with_options(id_hint()).await?;
            Ok(())
        })
        .await
    }

    pub async fn delete_many(
        &self,
        database: &str,
        collection: &str,
        filter: BsonDocument,
    ) -> Result<()> {
        let col = self.collection(database, collection);
        self.bounded(Operation::DeleteMany, async move {
            col.delete_many(filter).with_options(id_hint()).await?;
            Ok(())
        })
        .await
    }

    /// Remove the collection and all of its documents
    pub async fn drop_collection(&self, database: &str, collection: &str) -> Result<()> {
        let col = self.collection(database, collection);
        self.bounded(Operation::DropCollection, async move {
            col.drop().await?;
            Ok(())
        })
        .await
    }
}

/// Issue a find and buffer every result
async fn drain(
    col: Collection<BsonDocument>,
    filter: BsonDocument,
    find_options: FindOptions,
) -> Result<Vec<BsonDocument>> {
    let cursor = col.find(filter).with_options(find_options).await?;

    cursor
        .try_collect()
        .await
        .map_err(|e| BridgeError::from(e).into_cursor_drain())
}

/// Deletes point the server at the primary-key index
fn id_hint() -> DeleteOptions {
    let mut delete_options = DeleteOptions::default();
    delete_options.hint = Some(Hint::Keys(id_ascending()));
    delete_options
}
