#[macro_use]
mod macros;

define_uuid_id!(PostId);
