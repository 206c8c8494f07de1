// src/services/replies.rs
//! Static, localized replies. German unless the caller asked for English.

use crate::message::Lang;

pub const CONTACT_URL: &str = "https://planville.de/kontakt";

pub fn out_of_scope(lang: Lang) -> &'static str {
    match lang {
        Lang::De => {
            "Ich kann nur Fragen zu Planville Dienstleistungen beantworten. \
             Bitte kontaktieren Sie uns direkt unter: https://planville.de/kontakt"
        }
        Lang::En => {
            "I can only answer questions related to Planville services. \
             Please contact us directly here: https://planville.de/kontakt"
        }
    }
}

pub fn no_information(lang: Lang) -> &'static str {
    match lang {
        Lang::De => {
            "Entschuldigung, ich habe leider keine passende Information zu Ihrer Anfrage.\n\n\
             📞 Kontaktieren Sie unser Team direkt:\n\
             👉 https://planville.de/kontakt"
        }
        Lang::En => {
            "Sorry, I could not find any matching information for your request.\n\n\
             📞 Please contact our team directly:\n\
             👉 https://planville.de/kontakt"
        }
    }
}

pub fn failure(lang: Lang) -> &'static str {
    match lang {
        Lang::De => {
            "Es ist ein Fehler aufgetreten. Bitte versuchen Sie es später erneut \
             oder kontaktieren Sie uns direkt.\n\n➡️ https://planville.de/kontakt"
        }
        Lang::En => {
            "Something went wrong. Please try again later \
             or contact us directly.\n\n➡️ https://planville.de/kontakt"
        }
    }
}
