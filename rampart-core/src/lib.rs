// Core types for the Rampart request validation layer
//
// The router hands every handler call to an `InterceptorChain` as an
// `Invocation`; interceptors inspect it and either let it through or return an
// `Error` that the chain turns into an `HttpResponse`.

pub mod error;
pub mod guard;
pub mod http;
pub mod interceptor;
pub mod session;

pub use error::*;
pub use guard::*;
pub use http::*;
pub use interceptor::*;
pub use session::*;
