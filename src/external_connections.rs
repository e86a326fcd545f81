use sqlx::PgConnection;

/// A live connection borrowed from a connection source. The connection is given back
/// when the handle is dropped.
pub trait ConnectionHandle: Send {
    fn borrow_connection(&mut self) -> &mut PgConnection;
}

/// Provides access to the systems driven adapters talk to, so business logic never
/// needs to know where its data actually lives
pub trait ExternalConnectivity: Send + Sync {
    type DbHandle<'cxn_borrow>: ConnectionHandle
    where
        Self: 'cxn_borrow;

    async fn database_cxn(&mut self) -> Result<Self::DbHandle<'_>, anyhow::Error>;
}
