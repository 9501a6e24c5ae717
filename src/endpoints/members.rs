//! Member resource operations.

use reqwest::Method;

use super::{Endpoint, Payload, OK, OK_OR_CREATED};

pub const LIST: Endpoint = Endpoint::new(Method::GET, "/members", Payload::None, OK);
pub const GET: Endpoint = Endpoint::new(Method::GET, "/members/{}", Payload::None, OK);
pub const CREATE: Endpoint = Endpoint::new(Method::POST, "/members", Payload::Json, OK_OR_CREATED);
pub const UPDATE: Endpoint = Endpoint::new(Method::PUT, "/members/{}", Payload::Json, OK_OR_CREATED);
pub const DELETE: Endpoint = Endpoint::new(Method::DELETE, "/members/{}", Payload::None, OK);
pub const PROJECTS: Endpoint = Endpoint::new(Method::GET, "/members/{}/projects", Payload::None, OK);
// member then project id, no intermediate segment
pub const ADD_PROJECT: Endpoint = Endpoint::new(Method::POST, "/members/{}/{}", Payload::Json, OK_OR_CREATED);
pub const LOGO: Endpoint = Endpoint::new(Method::GET, "/members/{}/logo", Payload::None, OK);
pub const SET_LOGO: Endpoint = Endpoint::new(Method::POST, "/members/{}/logo", Payload::Image, OK_OR_CREATED);
pub const TAGS: Endpoint = Endpoint::new(Method::GET, "/members/{}/tags", Payload::None, OK);
pub const ADD_TAG: Endpoint = Endpoint::new(Method::PUT, "/members/{}/tags", Payload::Json, OK_OR_CREATED);
// tag to remove travels in the request body
pub const REMOVE_TAG: Endpoint = Endpoint::new(Method::DELETE, "/members/{}/tags", Payload::Json, OK_OR_CREATED);
