mod conversion_service_test;
mod endpoint_discovery_test;
