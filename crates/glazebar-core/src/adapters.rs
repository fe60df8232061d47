pub mod glazewm_client;
