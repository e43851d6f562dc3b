pub mod http_chat_gateway;
