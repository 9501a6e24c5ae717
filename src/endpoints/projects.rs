//! Project resource operations.

use reqwest::Method;

use super::{Endpoint, Payload, OK, OK_OR_CREATED};

pub const LIST: Endpoint = Endpoint::new(Method::GET, "/projects", Payload::None, OK);
pub const GET: Endpoint = Endpoint::new(Method::GET, "/projects/{}", Payload::None, OK);
pub const CREATE: Endpoint = Endpoint::new(Method::POST, "/projects", Payload::Json, OK_OR_CREATED);
pub const UPDATE: Endpoint = Endpoint::new(Method::PUT, "/projects/{}", Payload::Json, OK_OR_CREATED);
pub const DELETE: Endpoint = Endpoint::new(Method::DELETE, "/projects/{}", Payload::None, OK);
pub const MEMBERS: Endpoint = Endpoint::new(Method::GET, "/projects/{}/members", Payload::None, OK);
pub const LOGO: Endpoint = Endpoint::new(Method::GET, "/projects/{}/logo", Payload::None, OK);
