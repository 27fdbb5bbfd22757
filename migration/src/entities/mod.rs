pub mod sponsored_click;
pub mod sponsored_link;

pub use sponsored_click::Entity as SponsoredClickEntity;
pub use sponsored_link::Entity as SponsoredLinkEntity;
