pub mod product_usecase;

pub use product_usecase::ProductUsecase;
