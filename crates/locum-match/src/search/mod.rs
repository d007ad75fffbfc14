//! Job-offer proximity search, the consumer of the smart radius.

pub mod gateway;
pub mod router;
pub mod service;

pub use gateway::{
    CatalogError, GeocodeError, GeocodingGateway, JobOfferLocation, OfferCatalog, OfferId,
};
pub use router::{search_router, SearchApi};
pub use service::{within_radius, JobSearch, SearchError, SearchHit, SearchOutcome, SearchQuery};
