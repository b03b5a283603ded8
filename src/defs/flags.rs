use bitflags::bitflags;

bitflags! {
    /// Switches that change which triangles reach the polygon table.
    ///
    /// Both are on in [`RasterFlags::default`].
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct RasterFlags: u32 {
        // Drop triangles whose facing factor is <= 0.
        const CULL_BACK_FACES = 0x0000_0001;
        // Triangles poking above the top row get their edges stepped down
        // to the last visible row instead of being dropped.
        const TRUNCATE_TOP    = 0x0000_0002;
    }
}

impl Default for RasterFlags {
    fn default() -> Self {
        RasterFlags::CULL_BACK_FACES | RasterFlags::TRUNCATE_TOP
    }
}
