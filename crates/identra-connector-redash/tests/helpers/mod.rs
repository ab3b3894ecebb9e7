pub mod mock_redash;
