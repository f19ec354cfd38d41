//! Rendering of a [`Comment`] into a single mail record.
//!
//! Rendering is a pure function of the comment's fields, so rendering the
//! same comment twice yields identical bytes.

use super::comment::Comment;

const CTIME_FORMAT: &str = "%a %b %-d %H:%M:%S %Y";
const RFC822_FORMAT: &str = "%a, %-d %b %Y %H:%M:%S %z";

/// Renders `comment` as an mbox-style message with headers, body and a
/// trailing blank line.
#[must_use]
pub fn render(comment: &Comment) -> String {
    let from = comment.email();
    let to = &comment.to;
    let ctime = comment.created_at.format(CTIME_FORMAT);
    let date = comment.created_at.format(RFC822_FORMAT);

    format!(
        "From {from} {ctime}\n\
         Return-Path: <{from}>\n\
         Delivered-To: {to}\n\
         Envelope-To: {to}\n\
         Delivery-Date: {date}\n\
         From: {from}\n\
         To: {to}\n\
         Subject: {subject}\n\
         Date: {date}\n\
         Status: RO\n\
         \n\
         {body}\n\
         \n",
        subject = comment.subject,
        body = comment.message,
    )
}
