//! SMP packet framing
//!
//! Every PDU is a one byte command code followed by a fixed-size payload.
//! `PacketReader` only exposes a typed payload when the received size is
//! exactly the size expected for that payload; `PacketWriter` allocates a
//! buffer of exactly header + payload size.

use super::constants::*;
use super::types::*;
use crate::gap::constants::BD_ADDR_LEN;
use crate::gap::BdAddr;
use byteorder::{LittleEndian, ReadBytesExt};
use std::io::{Cursor, Read};
use std::marker::PhantomData;

/// SMP command codes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Code {
    PairingRequest,
    PairingResponse,
    PairingConfirm,
    PairingRandom,
    PairingFailed,
    EncryptionInformation,
    MasterIdentification,
    IdentityInformation,
    IdentityAddressInformation,
    SigningInformation,
    SecurityRequest,
    PairingPublicKey,
    PairingDhKeyCheck,
    PairingKeypressNotification,
}

impl Code {
    /// Convert to u8 value for protocol
    pub fn to_u8(&self) -> u8 {
        match self {
            Code::PairingRequest => SMP_PAIRING_REQUEST,
            Code::PairingResponse => SMP_PAIRING_RESPONSE,
            Code::PairingConfirm => SMP_PAIRING_CONFIRM,
            Code::PairingRandom => SMP_PAIRING_RANDOM,
            Code::PairingFailed => SMP_PAIRING_FAILED,
            Code::EncryptionInformation => SMP_ENCRYPTION_INFORMATION,
            Code::MasterIdentification => SMP_MASTER_IDENTIFICATION,
            Code::IdentityInformation => SMP_IDENTITY_INFORMATION,
            Code::IdentityAddressInformation => SMP_IDENTITY_ADDRESS_INFORMATION,
            Code::SigningInformation => SMP_SIGNING_INFORMATION,
            Code::SecurityRequest => SMP_SECURITY_REQUEST,
            Code::PairingPublicKey => SMP_PAIRING_PUBLIC_KEY,
            Code::PairingDhKeyCheck => SMP_PAIRING_DHK_CHECK,
            Code::PairingKeypressNotification => SMP_PAIRING_KEYPRESS_NOTIFICATION,
        }
    }

    /// Convert from u8 value from protocol
    pub fn from_u8(value: u8) -> Option<Self> {
        let code = match value {
            SMP_PAIRING_REQUEST => Code::PairingRequest,
            SMP_PAIRING_RESPONSE => Code::PairingResponse,
            SMP_PAIRING_CONFIRM => Code::PairingConfirm,
            SMP_PAIRING_RANDOM => Code::PairingRandom,
            SMP_PAIRING_FAILED => Code::PairingFailed,
            SMP_ENCRYPTION_INFORMATION => Code::EncryptionInformation,
            SMP_MASTER_IDENTIFICATION => Code::MasterIdentification,
            SMP_IDENTITY_INFORMATION => Code::IdentityInformation,
            SMP_IDENTITY_ADDRESS_INFORMATION => Code::IdentityAddressInformation,
            SMP_SIGNING_INFORMATION => Code::SigningInformation,
            SMP_SECURITY_REQUEST => Code::SecurityRequest,
            SMP_PAIRING_PUBLIC_KEY => Code::PairingPublicKey,
            SMP_PAIRING_DHK_CHECK => Code::PairingDhKeyCheck,
            SMP_PAIRING_KEYPRESS_NOTIFICATION => Code::PairingKeypressNotification,
            _ => return None,
        };
        Some(code)
    }
}

/// A fixed-size SMP payload
pub trait Payload: Sized {
    /// Size of the payload on the wire, in bytes
    const SIZE: usize;

    /// Decode from a slice of exactly `SIZE` bytes
    fn read(payload: &[u8]) -> SmpResult<Self>;

    /// Append the wire encoding to `out`
    fn write(&self, out: &mut Vec<u8>);
}

/// Pairing Request / Pairing Response parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairingRequestParams {
    /// IO capability
    pub io_capability: IoCapability,
    /// OOB data flag
    pub oob_data_flag: OobDataFlag,
    /// Authentication requirements
    pub auth_req: AuthReq,
    /// Maximum encryption key size
    pub max_encryption_key_size: u8,
    /// Keys the initiator will distribute
    pub initiator_key_dist_gen: KeyDistGen,
    /// Keys the responder will distribute
    pub responder_key_dist_gen: KeyDistGen,
}

/// The response carries the same fields as the request
pub type PairingResponseParams = PairingRequestParams;

impl Payload for PairingRequestParams {
    const SIZE: usize = 6;

    fn read(payload: &[u8]) -> SmpResult<Self> {
        let mut cursor = Cursor::new(payload);
        let mut next = || {
            cursor
                .read_u8()
                .map_err(|_| SmpError::InvalidParameter("Pairing parameters too short".into()))
        };

        let io_capability = next()?;
        let io_capability = IoCapability::from_u8(io_capability).ok_or_else(|| {
            SmpError::InvalidParameter(format!("Reserved IO capability {:#04x}", io_capability))
        })?;
        let oob_data_flag = next()?;
        let oob_data_flag = OobDataFlag::from_u8(oob_data_flag).ok_or_else(|| {
            SmpError::InvalidParameter(format!("Reserved OOB data flag {:#04x}", oob_data_flag))
        })?;

        Ok(Self {
            io_capability,
            oob_data_flag,
            auth_req: AuthReq::from_bits_retain(next()?),
            max_encryption_key_size: next()?,
            initiator_key_dist_gen: KeyDistGen::from_bits_retain(next()?),
            responder_key_dist_gen: KeyDistGen::from_bits_retain(next()?),
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.push(self.io_capability.to_u8());
        out.push(self.oob_data_flag.to_u8());
        out.push(self.auth_req.bits());
        out.push(self.max_encryption_key_size);
        out.push(self.initiator_key_dist_gen.bits());
        out.push(self.responder_key_dist_gen.bits());
    }
}

// Confirm, random, LTK and IRK payloads are all a bare 128-bit value.
impl Payload for UInt128 {
    const SIZE: usize = 16;

    fn read(payload: &[u8]) -> SmpResult<Self> {
        let mut value = [0u8; 16];
        Cursor::new(payload)
            .read_exact(&mut value)
            .map_err(|_| SmpError::InvalidParameter("128-bit value too short".into()))?;
        Ok(value)
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(self);
    }
}

/// Pairing Failed parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PairingFailedParams {
    /// Raw reason code
    pub reason: u8,
}

impl PairingFailedParams {
    pub fn new(ecode: ErrorCode) -> Self {
        Self {
            reason: ecode.to_u8(),
        }
    }

    /// The reason as a known error code, if it is one
    pub fn error_code(&self) -> Option<ErrorCode> {
        ErrorCode::from_u8(self.reason)
    }
}

impl Payload for PairingFailedParams {
    const SIZE: usize = 1;

    fn read(payload: &[u8]) -> SmpResult<Self> {
        let reason = Cursor::new(payload)
            .read_u8()
            .map_err(|_| SmpError::InvalidParameter("Failed to read reason".into()))?;
        Ok(Self { reason })
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.push(self.reason);
    }
}

/// Master Identification parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MasterIdentificationParams {
    /// EDIV (Encrypted Diversifier)
    pub ediv: u16,
    /// Rand (Random number)
    pub rand: u64,
}

impl Payload for MasterIdentificationParams {
    const SIZE: usize = 10;

    fn read(payload: &[u8]) -> SmpResult<Self> {
        let mut cursor = Cursor::new(payload);
        let ediv = cursor
            .read_u16::<LittleEndian>()
            .map_err(|_| SmpError::InvalidParameter("Failed to read EDIV".into()))?;
        let rand = cursor
            .read_u64::<LittleEndian>()
            .map_err(|_| SmpError::InvalidParameter("Failed to read Rand".into()))?;

        Ok(Self { ediv, rand })
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.extend_from_slice(&self.ediv.to_le_bytes());
        out.extend_from_slice(&self.rand.to_le_bytes());
    }
}

/// Identity Address Information parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdentityAddressInformationParams {
    /// Address type
    pub address_type: AddressType,
    /// Bluetooth device address
    pub bd_addr: BdAddr,
}

impl Payload for IdentityAddressInformationParams {
    const SIZE: usize = 1 + BD_ADDR_LEN;

    fn read(payload: &[u8]) -> SmpResult<Self> {
        let mut cursor = Cursor::new(payload);
        let address_type = cursor
            .read_u8()
            .map_err(|_| SmpError::InvalidParameter("Failed to read address type".into()))?;
        let address_type = AddressType::from_u8(address_type).ok_or_else(|| {
            SmpError::InvalidParameter(format!("Reserved address type {:#04x}", address_type))
        })?;

        let mut bytes = [0u8; BD_ADDR_LEN];
        cursor
            .read_exact(&mut bytes)
            .map_err(|_| SmpError::InvalidParameter("Failed to read BD_ADDR".into()))?;

        Ok(Self {
            address_type,
            bd_addr: BdAddr::new(bytes),
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.push(self.address_type.to_u8());
        out.extend_from_slice(self.bd_addr.as_slice());
    }
}

/// Security Request parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SecurityRequestParams {
    /// Authentication requirements
    pub auth_req: AuthReq,
}

impl Payload for SecurityRequestParams {
    const SIZE: usize = 1;

    fn read(payload: &[u8]) -> SmpResult<Self> {
        let auth_req = Cursor::new(payload)
            .read_u8()
            .map_err(|_| SmpError::InvalidParameter("Failed to read AuthReq".into()))?;
        Ok(Self {
            auth_req: AuthReq::from_bits_retain(auth_req),
        })
    }

    fn write(&self, out: &mut Vec<u8>) {
        out.push(self.auth_req.bits());
    }
}

/// Read-only view over a received PDU
#[derive(Debug, Clone, Copy)]
pub struct PacketReader<'a> {
    data: &'a [u8],
}

impl<'a> PacketReader<'a> {
    /// Wrap a received PDU. Fails if the header is missing.
    pub fn new(data: &'a [u8]) -> SmpResult<Self> {
        if data.len() < SMP_HEADER_SIZE {
            return Err(SmpError::InvalidParameter("PDU too short".into()));
        }
        Ok(Self { data })
    }

    /// Raw command code
    pub fn code(&self) -> u8 {
        self.data[0]
    }

    /// The whole PDU, header included
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Number of bytes following the header
    pub fn payload_size(&self) -> usize {
        self.data.len() - SMP_HEADER_SIZE
    }

    /// Decode the payload. The size must match `P::SIZE` exactly.
    pub fn payload<P: Payload>(&self) -> SmpResult<P> {
        if self.payload_size() != P::SIZE {
            return Err(SmpError::MalformedPdu {
                code: self.code(),
                expected: P::SIZE,
                actual: self.payload_size(),
            });
        }
        P::read(&self.data[SMP_HEADER_SIZE..])
    }
}

/// Builds a single PDU in a buffer sized exactly for its payload
#[derive(Debug)]
pub struct PacketWriter<P: Payload> {
    buffer: Vec<u8>,
    _payload: PhantomData<P>,
}

impl<P: Payload> PacketWriter<P> {
    /// Allocate the PDU buffer and write the header
    pub fn new(code: Code) -> SmpResult<Self> {
        #[cfg(test)]
        if allocation_fault::should_fail() {
            return Err(SmpError::OutOfMemory);
        }

        let mut buffer = Vec::new();
        buffer
            .try_reserve_exact(SMP_HEADER_SIZE + P::SIZE)
            .map_err(|_| SmpError::OutOfMemory)?;
        buffer.push(code.to_u8());

        Ok(Self {
            buffer,
            _payload: PhantomData,
        })
    }

    /// Write the payload and return the finished PDU
    pub fn finish(mut self, payload: &P) -> Vec<u8> {
        payload.write(&mut self.buffer);
        debug_assert_eq!(self.buffer.len(), SMP_HEADER_SIZE + P::SIZE);
        self.buffer
    }
}
