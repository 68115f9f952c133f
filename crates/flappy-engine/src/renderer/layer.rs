/// Render pass, in the fixed back-to-front order one frame is composed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum RenderLayer {
    /// Sky gradient and clouds.
    Background = 0,
    /// Pipe pairs.
    Obstacles = 1,
    /// Ground band with grass.
    Terrain = 2,
    /// The player, on top of everything.
    Player = 3,
}

impl RenderLayer {
    pub const COUNT: usize = 4;

    /// All layers in draw order.
    pub const ORDER: [RenderLayer; Self::COUNT] = [
        RenderLayer::Background,
        RenderLayer::Obstacles,
        RenderLayer::Terrain,
        RenderLayer::Player,
    ];
}
