pub mod csv_sink;
pub mod fetch_service;
pub mod ingest_service;
