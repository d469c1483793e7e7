pub mod client;
pub mod model;

pub use client::VertexHttpClient;
pub use model::VertexModel;

#[cfg(test)]
pub(crate) mod test_support;
