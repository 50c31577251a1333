pub mod asm;
pub mod mock;
pub mod observability;
pub mod settings;

pub use asm::AsmHttpClient;
pub use mock::MockAsmApi;
