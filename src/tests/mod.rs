mod unit_config;
