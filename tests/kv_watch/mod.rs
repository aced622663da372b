mod health_test;
mod kv_watch_test;
mod shutdown_test;
