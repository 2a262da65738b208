pub mod blob;
pub mod mailer;
pub mod renderer;

pub use blob::{BlobStore, HttpBlobStore, StoredBlob};
pub use mailer::{MailAttachment, Mailer, SmtpMailer};
pub use renderer::{HttpInvoiceRenderer, InvoiceRenderer};
