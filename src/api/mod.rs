//! Resilient client for the portal's HTTP API.
//!
//! Requests go to one current base address. When that address answers with a
//! routing error or an opaque response, the well-known local servers are tried
//! in order and the first one that answers becomes the new current address.
//! Response bodies are decoded leniently: a broken or missing body is an empty
//! object, never an error.

pub mod address;
mod client;
mod decode;
mod endpoints;
mod reqwest_transport;
mod token_store;
mod transport;

pub use self::client::{ApiClient, RequestOptions};
pub use self::decode::{decode_body, error_message};
pub use self::endpoints::{BookmarkRequest, CenterDetails, ProfileUpdate, RegisterRequest};
pub use self::in_memory_test::InMemoryTestTransport;
pub use self::reqwest_transport::ReqwestTransport;
pub use self::token_store::{FileTokenStore, MemoryTokenStore, TokenStore, AUTH_TOKEN_KEY};
pub use self::transport::{HttpRequest, HttpResponse, HttpTransport, Method, ResponseKind, TransportError};
