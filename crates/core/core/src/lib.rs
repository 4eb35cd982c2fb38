//! # CG Core
//!
//! Shared data types for the CG bot toolkit. This crate defines the message
//! body, attachment and reference structs that appear both in outbound
//! `sendMessage` calls and in inbound webhook events.
//!
//! Everything here is a plain data shape; wire names are `camelCase`.

pub mod types;

pub use types::{
    Attachment, BotRef, ChannelRef, CommunityRef, Mention, Message, MessageBody, UserRef,
};
