use shared_types::{ChannelHeader, CodecError, Envelope, HeaderType, Payload};

/// Envelope of a block entry with its channel header decoded.
#[derive(Clone, Debug)]
pub struct DecodedEntry {
    pub envelope: Envelope,
    pub header: ChannelHeader,
}

impl DecodedEntry {
    pub fn header_type(&self) -> Option<HeaderType> {
        self.header.header_type()
    }
}

/// Unwrap envelope → payload → channel header.
pub fn decode_entry(raw: &[u8]) -> Result<DecodedEntry, CodecError> {
    let envelope = Envelope::from_bytes(raw)?;
    let payload = Payload::from_bytes(&envelope.payload)?;
    let header = ChannelHeader::from_bytes(&payload.header.channel_header)?;
    Ok(DecodedEntry { envelope, header })
}
