use {async_trait::async_trait, rand::Rng};

use crate::{
    error::MediaError,
    traits::MediaBuilder,
    types::{GeoPoint, InputMedia, MessageMedia},
};

/// Builds media that needs no file storage: locations, contacts, venues,
/// and dice. File-backed media fails with [`MediaError::Unsupported`].
pub struct InlineMediaBuilder;

#[async_trait]
impl MediaBuilder for InlineMediaBuilder {
    async fn build(&self, media: &InputMedia) -> Result<MessageMedia, MediaError> {
        match media {
            InputMedia::Empty => Ok(MessageMedia::Empty),
            InputMedia::GeoPoint { geo_point } => Ok(MessageMedia::Geo {
                geo: checked_geo(*geo_point)?,
            }),
            InputMedia::Contact {
                phone_number,
                first_name,
                last_name,
                vcard,
            } => {
                if phone_number.trim().is_empty() {
                    return Err(MediaError::invalid("contact without phone number"));
                }
                Ok(MessageMedia::Contact {
                    phone_number: phone_number.clone(),
                    first_name: first_name.clone(),
                    last_name: last_name.clone(),
                    vcard: vcard.clone(),
                    user_id: 0,
                })
            },
            InputMedia::Venue {
                geo_point,
                title,
                address,
                provider,
                venue_id,
            } => Ok(MessageMedia::Venue {
                geo: checked_geo(*geo_point)?,
                title: title.clone(),
                address: address.clone(),
                provider: provider.clone(),
                venue_id: venue_id.clone(),
            }),
            InputMedia::Dice { emoticon } => {
                let faces = dice_faces(emoticon)
                    .ok_or_else(|| MediaError::invalid(format!("unknown dice: {emoticon}")))?;
                Ok(MessageMedia::Dice {
                    value: roll(faces),
                    emoticon: emoticon.clone(),
                })
            },
            InputMedia::UploadedPhoto { .. }
            | InputMedia::Photo { .. }
            | InputMedia::UploadedDocument { .. }
            | InputMedia::Document { .. } => Err(MediaError::Unsupported { kind: media.kind() }),
        }
    }
}

fn checked_geo(geo: GeoPoint) -> Result<GeoPoint, MediaError> {
    if !(-90.0..=90.0).contains(&geo.lat) || !(-180.0..=180.0).contains(&geo.long) {
        return Err(MediaError::invalid(format!(
            "geo point out of range: {}, {}",
            geo.lat, geo.long
        )));
    }
    Ok(geo)
}

fn dice_faces(emoticon: &str) -> Option<i32> {
    match emoticon {
        "🎲" | "🎯" | "🎳" => Some(6),
        "🏀" | "⚽" => Some(5),
        "🎰" => Some(64),
        _ => None,
    }
}

fn roll(faces: i32) -> i32 {
    rand::rng().random_range(1..=faces)
}
