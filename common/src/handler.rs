//! [`Handler`] abstractions.

use std::future::Future;

/// Asynchronous handler of an operation described by `Args`.
///
/// Every query and command of the service, as well as every request to the
/// CMS, is expressed as an implementation of this trait for a particular
/// `Args` type.
pub trait Handler<Args = ()> {
    /// Type of successful [`Handler`] result.
    type Ok;

    /// Type of this [`Handler`] error.
    type Err;

    /// Executes this [`Handler`] with the provided arguments.
    fn execute(
        &self,
        args: Args,
    ) -> impl Future<Output = Result<Self::Ok, Self::Err>>;
}
