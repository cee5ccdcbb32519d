pub mod decode;
pub mod intent;
pub mod normalize;
pub mod refusal;
pub mod remote;
