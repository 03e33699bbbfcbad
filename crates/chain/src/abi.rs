//! ABI event definitions for the escrow contract (`spec.md` §6.1), expressed
//! with `alloy::sol!` instead of runtime ABI reflection — see the "Dynamic
//! event argument shapes" design note.

use alloy::sol;

sol! {
    event TaskCreated(uint256 indexed taskId, address indexed requester, uint128 payoutAmount, uint16 maxWinners, uint40 deadline, bytes32 specHash);
    event TaskFunded(uint256 indexed taskId, address indexed requester, uint256 escrowedAmount, uint256 depositFeePaid);
    event Claimed(uint256 indexed taskId, uint256 indexed submissionId, address indexed agent);
    event ProofSubmitted(uint256 indexed taskId, uint256 indexed submissionId, address indexed agent, bytes32 proofHash);
    event Approved(uint256 indexed taskId, uint256 indexed submissionId, address indexed approver);
    event Rejected(uint256 indexed taskId, uint256 indexed submissionId, address indexed approver);
    event Withdrawn(uint256 indexed taskId, uint256 indexed submissionId, address indexed agent, uint256 netPayout, uint256 recipientFee);
    event DisputeOpened(uint256 indexed taskId, uint256 indexed submissionId, address indexed by);
    event DisputeResolved(uint256 indexed taskId, uint256 indexed submissionId, address indexed by, bool approved);
    event TaskClosed(uint256 indexed taskId, address indexed requester, uint256 refunded);
    event TaskCancelled(uint256 indexed taskId, address indexed requester, uint256 refunded);
    event TaskRefunded(uint256 indexed taskId, address indexed requester, uint256 refunded, string reason);
}
