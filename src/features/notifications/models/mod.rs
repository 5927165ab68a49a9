mod mail;

pub use mail::OutgoingMail;
