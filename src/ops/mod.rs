pub mod contact_ops;
pub mod transfer_ops;
